use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use clap::Parser;
use indoc::indoc;

use journey_ui::UiFacade;
use journey_ui::clipboard::{self, Clipboard, MemoryClipboard, SystemClipboard};
use journey_ui::drivers::console::{ConsoleInputDriver, ConsoleOutputDriver};
use journey_ui::drivers::{InputEvent, OutputDriver};
use journey_ui::elements::{ElementMessage, ElementType};
use journey_ui::event_loop::{ControlFlow, EventLoop};
use journey_ui::model::Session;
use journey_ui::services::{
    EmptyStage, HeadlessPlatform, LoggingAudio, Network, Request, Services,
};
use journey_ui::settings::FileSettings;
use journey_ui::states::UiStateKind;
use journey_ui::tracing_sub;

const ABOUT: &str = indoc! {"
    Offline demo of the Journey client UI in a terminal.

    Windows are drawn at one cell per 8x16 pixels. Log in with any ID and
    password, pick a world and a character, then use the default key
    bindings (I for items, E for equipment, K for skills, Esc for the menu).
"};

#[derive(Parser, Debug)]
#[command(name = "journey-ui", about = ABOUT)]
struct Args {
    /// Where window positions are kept.
    #[arg(long, default_value = "journey-ui.toml")]
    settings: PathBuf,

    /// Write logs to this file instead of discarding them.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Start directly in the game screen.
    #[arg(long)]
    skip_login: bool,

    /// Milliseconds per update tick.
    #[arg(long, default_value_t = 16)]
    tick_ms: u64,
}

/// Answers requests the way a server would, on the next tick.
#[derive(Clone, Default)]
struct Loopback {
    pending: Rc<RefCell<VecDeque<Request>>>,
}

impl Network for Loopback {
    fn send(&mut self, request: Request) {
        tracing::debug!(?request, "send");
        self.pending.borrow_mut().push_back(request);
    }
}

impl Loopback {
    fn deliver(&self, ui: &mut UiFacade) {
        loop {
            let Some(request) = self.pending.borrow_mut().pop_front() else {
                break;
            };
            match request {
                Request::Login { .. } => ui.notify(ElementType::Login, ElementMessage::WorldsLoaded),
                Request::CharlistRequest { .. } => {
                    ui.notify(ElementType::WorldSelect, ElementMessage::CharactersLoaded)
                }
                Request::SelectCharacter { .. } | Request::LeaveCashShop => {
                    ui.change_state(UiStateKind::Game)
                }
                Request::EnterCashShop => ui.change_state(UiStateKind::CashShop),
                Request::GeneralChat { message } => {
                    let line = format!("{}: {}", ui.session().stats.name, message);
                    ui.notify(ElementType::ChatBar, ElementMessage::ChatLine(line));
                }
                other => tracing::trace!(request = ?other, "no loopback reply"),
            }
        }
    }
}

fn main() -> io::Result<()> {
    let args = Args::parse();
    // The terminal is in raw mode, so logs only go to a file.
    if let Some(path) = &args.log_file {
        tracing_sub::init(Some(path))?;
    }

    let network = Loopback::default();
    let clipboard: Box<dyn Clipboard> = if clipboard::available() {
        Box::new(SystemClipboard::new())
    } else {
        tracing::info!("no system clipboard, copy and paste stay in process");
        Box::new(MemoryClipboard::new())
    };
    let services = Services {
        audio: Box::new(LoggingAudio),
        network: Box::new(network.clone()),
        settings: Box::new(FileSettings::open(&args.settings)),
        stage: Box::new(EmptyStage),
        platform: Box::new(HeadlessPlatform),
        clipboard,
    };

    let mut output = ConsoleOutputDriver::new()?;
    output.enter()?;
    let mut ui = UiFacade::new(services, Session::sample());
    ui.resize(output.viewport()?);
    if args.skip_login {
        ui.change_state(UiStateKind::Game);
    }

    let mut event_loop = EventLoop::new(
        ConsoleInputDriver::new(),
        Duration::from_millis(args.tick_ms.max(1)),
    );
    let result = event_loop.run(|_, event| {
        match event {
            Some(event) => dispatch(&mut ui, event),
            None => {
                ui.update();
                output.draw(|canvas| ui.draw(canvas, 1.0))?;
            }
        }
        network.deliver(&mut ui);
        Ok(if ui.is_quit() {
            ControlFlow::Quit
        } else {
            ControlFlow::Continue
        })
    });

    output.exit()?;
    result
}

fn dispatch(ui: &mut UiFacade, event: InputEvent) {
    match event {
        InputEvent::Key { key, pressed } => ui.send_key(key, pressed),
        InputEvent::Char(c) => ui.send_char(c),
        InputEvent::CursorMoved(pos) => ui.send_cursor_move(pos),
        InputEvent::Button { pressed } => ui.send_cursor_button(pressed),
        InputEvent::DoubleClick => ui.doubleclick(),
        InputEvent::RightClick => ui.rightclick(),
        InputEvent::Scroll(delta) => ui.send_scroll(delta),
        InputEvent::Resize(viewport) => ui.resize(viewport),
        InputEvent::Close => ui.send_close(),
    }
}
