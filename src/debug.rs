use std::time::Instant;

use log::debug;

/// Logs how long a scope took once it is dropped.
pub struct Timing {
    start: Instant,
    stage: &'static str,
}

impl Timing {
    pub fn new(stage: &'static str) -> Self {
        Self {
            start: Instant::now(),
            stage,
        }
    }
}

impl Drop for Timing {
    #[inline]
    fn drop(&mut self) {
        debug!("[{:?}] {}", self.start.elapsed(), self.stage)
    }
}

macro_rules! TIME {
    () => {
        let _timing = $crate::debug::Timing::new(module_path!());
    };
    ($stage: expr) => {
        let _timing = $crate::debug::Timing::new($stage);
    };
}
pub(crate) use TIME;
