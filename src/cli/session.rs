//! Headless panel driven over stdio.
//!
//! Lines starting with `{` are host pushes and go straight onto the bus.
//! Anything else is a UI command acting on the selectors. Every envelope the
//! panel sends is written to stdout as one JSON line; human-readable notes go
//! to stderr.

use std::cell::RefCell;
use std::error::Error;
use std::rc::Rc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::core::bus::HostEndpoint;
use crate::core::config::Config;
use crate::core::session::{SessionHooks, UiSession};
use crate::ui::model_selector::MODEL_SELECTOR_ID;
use crate::ui::pointer::{PointerEvent, WidgetId};
use crate::ui::prompt_selector::PROMPT_SELECTOR_ID;

pub const COMMAND_HELP: &str = "\
Commands:
  open model|prompt          click the selector's trigger
  select model|prompt <id>   click an option row
  add model | edit prompt    click the trailing affordance row
  close model|prompt         close a selector
  click outside              pointer-down outside every selector
  show                       print both selectors
  state                      print the mirrored host state
  help                       show this help
  quit                       unmount and exit
Lines starting with '{' are host envelopes.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverCommand {
    HostPush(String),
    Open(WidgetId),
    Select(WidgetId, String),
    Affordance(WidgetId),
    Close(WidgetId),
    ClickOutside,
    Show,
    State,
    Help,
    Quit,
}

fn widget_named(name: &str) -> Result<WidgetId, String> {
    match name {
        "model" => Ok(MODEL_SELECTOR_ID),
        "prompt" => Ok(PROMPT_SELECTOR_ID),
        other => Err(format!("Unknown selector '{other}'; expected model or prompt")),
    }
}

pub fn parse_command(line: &str) -> Result<Option<DriverCommand>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    if line.starts_with('{') {
        return Ok(Some(DriverCommand::HostPush(line.to_string())));
    }

    let words: Vec<&str> = line.split_whitespace().collect();
    let command = match words.as_slice() {
        ["open", name] | ["click", "trigger", name] => DriverCommand::Open(widget_named(name)?),
        ["select", name, id] => DriverCommand::Select(widget_named(name)?, id.to_string()),
        ["add", "model"] => DriverCommand::Affordance(MODEL_SELECTOR_ID),
        ["edit", "prompt"] => DriverCommand::Affordance(PROMPT_SELECTOR_ID),
        ["close", name] => DriverCommand::Close(widget_named(name)?),
        ["click", "outside"] => DriverCommand::ClickOutside,
        ["show"] => DriverCommand::Show,
        ["state"] => DriverCommand::State,
        ["help"] => DriverCommand::Help,
        ["quit"] | ["exit"] => DriverCommand::Quit,
        _ => return Err(format!("Unrecognized command: {line}. Type 'help' for commands.")),
    };
    Ok(Some(command))
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct LineOutcome {
    /// Envelopes the panel sent, already encoded.
    pub outbound: Vec<String>,
    pub notes: Vec<String>,
    pub quit: bool,
}

pub struct Driver {
    session: UiSession,
    host: HostEndpoint,
    selections: Rc<RefCell<Vec<String>>>,
}

impl Driver {
    pub fn new(config: &Config) -> Self {
        let selections = Rc::new(RefCell::new(Vec::new()));
        let models = Rc::clone(&selections);
        let prompts = Rc::clone(&selections);
        let hooks = SessionHooks {
            on_model_select: Box::new(move |name| {
                models.borrow_mut().push(format!("Model selected: {name}"))
            }),
            on_prompt_select: Box::new(move |name| {
                prompts
                    .borrow_mut()
                    .push(format!("System prompt selected: {name}"))
            }),
        };
        let (session, host) = UiSession::mount(config, hooks);
        Self {
            session,
            host,
            selections,
        }
    }

    /// Envelopes sent so far that nobody has written out yet.
    pub fn flush_outbound(&mut self) -> Vec<String> {
        self.host
            .drain_sent()
            .iter()
            .filter_map(|message| match message.to_json() {
                Ok(text) => Some(text),
                Err(err) => {
                    debug!(error = %err, "Skipping unencodable envelope");
                    None
                }
            })
            .collect()
    }

    pub fn handle_line(&mut self, line: &str) -> LineOutcome {
        let mut outcome = LineOutcome::default();
        match parse_command(line) {
            Ok(Some(command)) => self.apply(command, &mut outcome),
            Ok(None) => {}
            Err(message) => outcome.notes.push(message),
        }
        outcome.notes.append(&mut self.selections.borrow_mut());
        outcome.outbound = self.flush_outbound();
        outcome
    }

    fn apply(&mut self, command: DriverCommand, outcome: &mut LineOutcome) {
        let result = match command {
            DriverCommand::HostPush(text) => {
                self.host.push_raw(text);
                let delivered = self.session.pump();
                if delivered == 0 {
                    outcome.notes.push("Host envelope ignored".to_string());
                } else if self.session.needs_render() {
                    outcome.notes.push(self.render());
                }
                Ok(())
            }
            DriverCommand::Open(widget) => self.session.click_trigger(widget),
            DriverCommand::Select(widget, id) => self.session.click_option(widget, &id),
            DriverCommand::Affordance(widget) => self.session.click_affordance(widget),
            DriverCommand::Close(widget) => {
                if widget == MODEL_SELECTOR_ID {
                    self.session.model_mut().close();
                } else {
                    self.session.prompt_mut().close();
                }
                Ok(())
            }
            DriverCommand::ClickOutside => {
                self.session.pointer_down(PointerEvent::outside());
                Ok(())
            }
            DriverCommand::Show => {
                outcome.notes.push(self.render());
                Ok(())
            }
            DriverCommand::State => {
                outcome
                    .notes
                    .push(format!("{:#?}", self.session.state().snapshot()));
                Ok(())
            }
            DriverCommand::Help => {
                outcome.notes.push(COMMAND_HELP.to_string());
                Ok(())
            }
            DriverCommand::Quit => {
                outcome.quit = true;
                Ok(())
            }
        };
        if let Err(err) = result {
            outcome.notes.push(err.to_string());
        }
    }

    fn render(&mut self) -> String {
        let view = self.session.render();
        format!("{}{}", view.model, view.prompt)
    }

    pub fn unmount(self) {
        self.session.unmount();
    }
}

pub async fn run_session(config: &Config) -> Result<(), Box<dyn Error>> {
    let mut driver = Driver::new(config);
    for line in driver.flush_outbound() {
        println!("{line}");
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let outcome = driver.handle_line(&line);
        for note in &outcome.notes {
            eprintln!("{note}");
        }
        for envelope in &outcome.outbound {
            println!("{envelope}");
        }
        if outcome.quit {
            break;
        }
    }

    driver.unmount();
    Ok(())
}
