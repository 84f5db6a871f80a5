//! Page flipping for the closing screens.

use bevy_ecs::prelude::Resource;

/// Rendered frames a page stays up before flipping on its own.
pub const PAGE_FRAMES: u32 = 1000;

#[derive(Resource, Debug, Clone)]
pub struct EndPager {
    page: usize,
    pages: usize,
    counter: u32,
    limit: u32,
}

impl EndPager {
    pub fn new(pages: usize) -> Self {
        Self {
            page: 0,
            pages: pages.max(1),
            counter: 0,
            limit: PAGE_FRAMES,
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit.max(1);
        self
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// Count one rendered frame; flips the page when the limit is reached.
    pub fn tick(&mut self) {
        self.counter += 1;
        if self.counter >= self.limit {
            self.next_page();
        }
    }

    /// Flip to the next page now, wrapping after the last one.
    pub fn next_page(&mut self) {
        self.counter = 0;
        self.page = (self.page + 1) % self.pages;
    }
}
