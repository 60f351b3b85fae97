//! Interactive session
//!
//! Reads commands from stdin, forwards them to the controller and redraws the
//! screen whenever the phone reports a change.

use anyhow::Result;
use chrono::{FixedOffset, Local, Offset, Utc};
use colored::Colorize;
use mockphone_core::state_table::EventType;
use mockphone_core::views::{
    format_call_timer, CallScreenView, ContactListView, HistoryView, MissedCallsView, Navigator,
    Screen, Tab, ViewContext,
};
use mockphone_core::{
    CallController, CallPhase, PhoneError, PhoneEvent, PhoneResult, Profile, RegistrationForm,
    TransitionOutcome,
};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::debug;

use crate::commands::{Input, HELP};
use crate::render;

pub type InputLines = Lines<BufReader<Stdin>>;

pub fn stdin_lines() -> InputLines {
    BufReader::new(tokio::io::stdin()).lines()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct App {
    controller: CallController,
    navigator: Navigator,
    query: String,
    offset: FixedOffset,
}

impl App {
    pub fn new(controller: CallController) -> Self {
        Self {
            controller,
            navigator: Navigator::new(),
            query: String::new(),
            offset: Local::now().offset().fix(),
        }
    }

    fn context(&self) -> ViewContext {
        ViewContext::new(Utc::now(), self.offset)
    }

    pub fn screen(&self) -> Screen {
        Screen::resolve(self.controller.current_call().is_some(), &self.navigator)
    }

    /// Full text of the current screen
    pub fn render(&self) -> String {
        match self.screen() {
            Screen::Call => match self.controller.current_call() {
                Some(call) => {
                    let elapsed = self.controller.active_elapsed_secs().unwrap_or(0);
                    render::call_screen(&CallScreenView::build(&call, elapsed))
                }
                None => String::new(),
            },
            Screen::MissedCalls => render::missed_calls(&MissedCallsView::build(
                &self.controller.missed_calls(),
                &self.context(),
            )),
            Screen::Tab(tab) => {
                let body = match tab {
                    Tab::Contacts => render::contact_list(&ContactListView::build(
                        self.controller.directory(),
                        &self.query,
                        self.controller.missed_call_count(),
                    )),
                    Tab::History => render::history(&HistoryView::build(
                        &self.controller.history(),
                        &self.context(),
                    )),
                };
                format!("{}\n{}", render::tab_bar(tab), body)
            }
        }
    }

    fn redraw(&self) {
        println!("\n{}", self.render());
    }

    /// Apply one parsed command. Messages for the user are returned, not
    /// printed.
    pub fn handle(&mut self, input: Input) -> (Flow, Option<String>) {
        let result = match input {
            Input::Empty => return (Flow::Continue, None),
            Input::Quit => return (Flow::Quit, None),
            Input::Help => return (Flow::Continue, Some(HELP.to_string())),
            Input::Contacts(query) => {
                self.query = query;
                self.navigator.select_tab(Tab::Contacts);
                return (Flow::Continue, None);
            }
            Input::Tab(tab) => {
                self.navigator.select_tab(tab);
                return (Flow::Continue, None);
            }
            Input::Missed => {
                self.navigator.show_missed();
                return (Flow::Continue, None);
            }
            Input::Back => {
                self.navigator.back();
                return (Flow::Continue, None);
            }
            Input::Call(id) => self.controller.place_call(&id),
            Input::Ring(id) => self.controller.simulate_incoming(&id),
            Input::Answer => self.controller.answer(),
            Input::Decline => self.controller.decline(),
            Input::Hangup => self.controller.end_call(),
        };
        (Flow::Continue, describe_failure(result))
    }

    /// Run until `quit`, end of input or controller shutdown
    pub async fn run(&mut self, lines: &mut InputLines) -> Result<()> {
        let mut events = self.controller.subscribe_simple();
        self.redraw();

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    let (flow, message) = match Input::parse(&line) {
                        Ok(input) => self.handle(input),
                        Err(e) => (Flow::Continue, Some(e.to_string())),
                    };
                    if let Some(message) = message {
                        println!("{}", message);
                    }
                    if flow == Flow::Quit {
                        break;
                    }
                    self.redraw();
                }
                event = events.next() => {
                    let Some(event) = event else { break };
                    if !self.on_event(event) {
                        break;
                    }
                }
            }
        }

        self.controller.shutdown();
        Ok(())
    }

    /// Returns `false` once no more events will arrive
    fn on_event(&self, event: PhoneEvent) -> bool {
        debug!("Phone event: {:?}", event);
        match event {
            PhoneEvent::CallStateChanged { previous, current, .. } => {
                // Commands typed at the prompt redraw on their own; this
                // catches the timer-driven changes
                if (previous.is_idle() && current == CallPhase::Incoming) || current.is_idle() {
                    self.redraw();
                }
            }
            PhoneEvent::DurationTick { elapsed_secs, .. } => {
                println!("  {}", format_call_timer(elapsed_secs).green());
            }
            PhoneEvent::IncomingCallDropped { contact } => {
                println!("{}", format!("Missed a simulated call from {} (line busy)", contact.name).yellow());
            }
            PhoneEvent::ShutDown => return false,
            PhoneEvent::HistoryAppended(_)
            | PhoneEvent::MissedCallAppended(_)
            | PhoneEvent::CommandIgnored { .. } => {}
        }
        true
    }
}

fn verb(event: EventType) -> &'static str {
    match event {
        EventType::PlaceCall => "place a call",
        EventType::SimulatedIncoming => "ring",
        EventType::Answer => "answer",
        EventType::Decline => "decline",
        EventType::EndCall => "hang up",
        EventType::BlockedTimeout => "clear the blocked screen",
    }
}

fn describe_failure(result: PhoneResult<TransitionOutcome>) -> Option<String> {
    match result {
        Ok(TransitionOutcome::Applied(_)) => None,
        Ok(TransitionOutcome::Ignored { phase, event })
        | Err(PhoneError::InvalidTransition { phase, event }) => {
            Some(format!("Cannot {} while {}", verb(event), phase))
        }
        Err(e) => Some(e.to_string()),
    }
}

/// Prompt for the registration form until it validates. `None` on end of
/// input.
pub async fn register(lines: &mut InputLines) -> Result<Option<Profile>> {
    println!("{}", "Create your profile".bold());
    loop {
        let Some(full_name) = prompt(lines, "Full name: ").await? else { return Ok(None) };
        let Some(email) = prompt(lines, "Work email: ").await? else { return Ok(None) };
        let Some(pin_code) = prompt(lines, "PIN code: ").await? else { return Ok(None) };
        let Some(consent) = prompt(lines, "I confirm my details and consent to data processing [y/N]: ").await? else {
            return Ok(None);
        };
        let consented = matches!(consent.trim().to_ascii_lowercase().as_str(), "y" | "yes");

        match RegistrationForm::new(full_name, email, pin_code)
            .with_consent(consented)
            .validate()
        {
            Ok(profile) => return Ok(Some(profile)),
            Err(e) => println!("{}", e.to_string().red()),
        }
    }
}

async fn prompt(lines: &mut InputLines, label: &str) -> Result<Option<String>> {
    use std::io::Write;
    print!("{}", label);
    std::io::stdout().flush()?;
    Ok(lines.next_line().await?)
}
