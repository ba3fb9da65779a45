//! Per-run caps on external generation requests.
//!
//! A [`Budget`] lives for exactly one run and is threaded through article
//! building as `&mut Budget`. An attempt is counted the moment it is allowed,
//! whether or not the request then succeeds.

#[derive(Debug, Clone)]
pub struct Budget {
    max_text: u32,
    max_images: u32,
    text_used: u32,
    images_used: u32,
}

impl Budget {
    pub fn new(max_text: u32, max_images: u32) -> Self {
        Self {
            max_text,
            max_images,
            text_used: 0,
            images_used: 0,
        }
    }

    /// Claim one text-generation attempt. `false` once the cap is reached.
    pub fn try_text(&mut self) -> bool {
        claim(&mut self.text_used, self.max_text)
    }

    /// Claim one image-generation attempt. `false` once the cap is reached.
    pub fn try_image(&mut self) -> bool {
        claim(&mut self.images_used, self.max_images)
    }

    pub fn text_used(&self) -> u32 {
        self.text_used
    }

    pub fn images_used(&self) -> u32 {
        self.images_used
    }

    /// Every image attempt of this run has been spent.
    pub fn images_exhausted(&self) -> bool {
        self.images_used >= self.max_images
    }
}

fn claim(used: &mut u32, max: u32) -> bool {
    if *used >= max {
        return false;
    }
    *used += 1;
    true
}
