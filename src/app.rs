use std::sync::Arc;

use color_eyre::eyre::eyre;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info};

use crate::Theme;
use crate::commands::{self, Command, CreateBucketCmd, LaunchInstancesCmd};
use crate::config::KeyResolver;
use crate::console::{self, Effect, Model, Msg};
use crate::provider::aws::{Ec2Connector, S3Connector};
use crate::tui::{Event, Tui};
use crate::ui::{Component, Spinner};

const FRAME_RATE: f64 = 30.0;
const TICK_RATE: f64 = 8.0;

enum Step {
    Event(Option<Event>),
    Msg(Msg),
}

/// The interactive console: owns the model and drives it from terminal
/// events and finished commands.
pub struct App {
    model: Model,
    resolver: Arc<KeyResolver>,
    theme: Theme,
    spinner: Spinner,
    msg_tx: UnboundedSender<Msg>,
    msg_rx: UnboundedReceiver<Msg>,
    should_suspend: bool,
}

impl App {
    pub fn new(region: &str, resolver: Arc<KeyResolver>, theme: Theme) -> Self {
        let (msg_tx, msg_rx) = mpsc::unbounded_channel();
        Self {
            model: Model::new(region),
            resolver,
            theme,
            spinner: Spinner::new("Waiting for AWS..."),
            msg_tx,
            msg_rx,
            should_suspend: false,
        }
    }

    pub async fn run(&mut self) -> color_eyre::Result<()> {
        let mut tui = Tui::new(FRAME_RATE, TICK_RATE)?;
        tui.enter()?;
        info!("Console started");

        loop {
            let step = tokio::select! {
                event = tui.next_event() => Step::Event(event),
                Some(msg) = self.msg_rx.recv() => Step::Msg(msg),
            };

            match step {
                Step::Event(None) => break,
                Step::Event(Some(event)) => self.handle_event(&mut tui, event)?,
                Step::Msg(msg) => self.dispatch(msg),
            }

            if self.should_suspend {
                self.should_suspend = false;
                tui.suspend()?;
                tui.resume()?;
            }
            if self.model.should_quit() {
                break;
            }
        }

        tui.exit()?;
        info!("Console closed");
        Ok(())
    }

    fn handle_event(&mut self, tui: &mut Tui, event: Event) -> color_eyre::Result<()> {
        match event {
            Event::Quit => self.dispatch(Msg::Quit),
            Event::Error(e) => return Err(eyre!("Terminal event error: {e}")),
            Event::Tick => {
                if self.model.is_pending() {
                    self.spinner.handle_tick();
                }
            }
            Event::Init | Event::Render | Event::Resize(..) => self.render(tui)?,
            Event::Key(key) => self.handle_key(key),
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('z') {
            self.should_suspend = true;
            return;
        }
        if let Some(msg) = console::translate(&self.model, &self.resolver, key) {
            self.dispatch(msg);
        }
    }

    fn dispatch(&mut self, msg: Msg) {
        if let Some(effect) = self.model.update(msg) {
            self.spawn(effect);
        }
    }

    fn spawn(&self, effect: Effect) {
        let tx = self.msg_tx.clone();
        let command: Box<dyn Command> = match effect {
            Effect::CreateBucket { region, params } => {
                Box::new(CreateBucketCmd::new(S3Connector, region, params, tx))
            }
            Effect::LaunchInstances { region, params } => {
                Box::new(LaunchInstancesCmd::new(Ec2Connector, region, params, tx))
            }
        };

        debug!("Spawning command: {}", command.name());
        tokio::spawn(commands::run(command, self.msg_tx.clone()));
    }

    fn render(&mut self, tui: &mut Tui) -> color_eyre::Result<()> {
        tui.draw(|frame| {
            console::view::render(
                frame,
                &self.model,
                &self.theme,
                &self.resolver,
                &mut self.spinner,
            );
        })?;
        Ok(())
    }
}
