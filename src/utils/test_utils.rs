#[cfg(test)]
use crate::core::bus::HostEndpoint;
#[cfg(test)]
use crate::core::config::Config;
#[cfg(test)]
use crate::core::session::{SessionHooks, UiSession};
#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

/// Names passed to the selection callbacks, oldest first.
#[cfg(test)]
#[derive(Clone, Default)]
pub struct Recorded {
    models: Rc<RefCell<Vec<String>>>,
    prompts: Rc<RefCell<Vec<String>>>,
}

#[cfg(test)]
impl Recorded {
    pub fn models(&self) -> Vec<String> {
        self.models.borrow().clone()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.borrow().clone()
    }

    fn hooks(&self) -> SessionHooks {
        let models = Rc::clone(&self.models);
        let prompts = Rc::clone(&self.prompts);
        SessionHooks {
            on_model_select: Box::new(move |name| models.borrow_mut().push(name.to_string())),
            on_prompt_select: Box::new(move |name| prompts.borrow_mut().push(name.to_string())),
        }
    }
}

#[cfg(test)]
pub fn mount_recording_session() -> (UiSession, HostEndpoint, Recorded) {
    let recorded = Recorded::default();
    let (session, host) = UiSession::mount(&Config::default(), recorded.hooks());
    (session, host, recorded)
}
