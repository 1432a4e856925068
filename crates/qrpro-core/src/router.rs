use qrpro_types::Page;

/// What the caller must do after a page switch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageChange {
    pub previous: Page,
    pub current: Page,
    /// Any page other than the scanner releases the camera
    pub stop_capture: bool,
    pub load_history: bool,
}

impl PageChange {
    pub fn changed(&self) -> bool {
        self.previous != self.current
    }
}

#[derive(Debug, Default)]
pub struct ViewRouter {
    current: Page,
}

impl ViewRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Page {
        self.current
    }

    pub fn show_page(&mut self, page: Page) -> PageChange {
        let previous = std::mem::replace(&mut self.current, page);
        PageChange {
            previous,
            current: page,
            stop_capture: page != Page::Scanner,
            load_history: page == Page::History,
        }
    }
}
