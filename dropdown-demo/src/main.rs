mod config;
mod paths;

use std::fs::{self, File};
use std::process::ExitCode;
use std::time::Duration;

use dropdown_menu::attributes::{BUTTON_TEXT, DISABLED};
use dropdown_menu::{DropdownMenu, TAG_NAME};
use simplelog::{Config, WriteLogger};
use tuidom::{Element, Event, Key, NodeId, Page, Terminal};

use config::{DemoConfig, DemoError};

const STATUS_ID: &str = "status";
const POLL_INTERVAL: Duration = Duration::from_millis(250);

const HELP: &str = "Tab: focus  Enter/click: activate  Esc: close  d: disable  t: label  q: quit";

fn init_logging(config: &DemoConfig) -> Result<(), DemoError> {
    let level = config.level()?;
    let rotated = paths::rotate_logs();
    let Some(path) = paths::log_file() else {
        return Ok(());
    };
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    WriteLogger::init(level, Config::default(), File::create(&path)?)?;
    log::info!("[demo] logging to {}", path.display());
    if let Err(e) = rotated {
        log::warn!("[demo] log rotation failed: {}", e);
    }
    Ok(())
}

struct Demo {
    page: Page,
    menu: NodeId,
    status: NodeId,
    labels: Vec<String>,
    next_label: usize,
}

impl Demo {
    fn new(config: &DemoConfig) -> Result<Self, DemoError> {
        let mut page = Page::new();
        dropdown_menu::define(&mut page)?;
        let body = page.body();

        let mut menu = Element::custom(TAG_NAME);
        if let Some(text) = &config.button_text {
            menu = menu.attr(BUTTON_TEXT, text.clone());
        }
        if config.disabled {
            menu = menu.attr(DISABLED, "");
        }
        let menu = menu.children(config.items.iter().map(|item| Element::button(item.clone())));

        page.instantiate(&Element::text("dropdown-menu demo"), body)?;
        let menu = page.instantiate(&menu, body)?;
        let status = page.instantiate(&Element::text("").id(STATUS_ID), body)?;
        page.instantiate(&Element::text(HELP), body)?;

        let mut demo = Self {
            page,
            menu,
            status,
            labels: config.labels.clone(),
            next_label: 0,
        };
        demo.update_status()?;
        Ok(demo)
    }

    fn update_status(&mut self) -> Result<(), DemoError> {
        let doc = self.page.document();
        let Some(menu) = self.page.element::<DropdownMenu>(self.menu) else {
            return Ok(());
        };
        let focus = self
            .page
            .focused()
            .and_then(|id| doc.node(id))
            .map(|n| n.text.clone())
            .unwrap_or_else(|| "-".into());
        let status = format!(
            "{} | {} | focus: {} | listeners: {}",
            if menu.is_open() { "open" } else { "closed" },
            if menu.disabled(doc) { "disabled" } else { "enabled" },
            focus,
            doc.listeners().count_owned_by(self.menu),
        );
        self.page.set_text(self.status, status)?;
        Ok(())
    }

    fn toggle_disabled(&mut self) -> Result<(), DemoError> {
        self.page
            .with_element::<DropdownMenu, _>(self.menu, |m, doc| {
                let disabled = !m.disabled(doc);
                m.set_disabled(doc, disabled)
            })??;
        Ok(())
    }

    fn cycle_label(&mut self) -> Result<(), DemoError> {
        let Some(label) = self.labels.get(self.next_label).cloned() else {
            return Ok(());
        };
        self.next_label = (self.next_label + 1) % self.labels.len();
        self.page
            .with_element::<DropdownMenu, _>(self.menu, |m, doc| m.set_button_text(doc, label))??;
        Ok(())
    }

    /// Handle one input event. Returns false when the demo should exit.
    fn handle(&mut self, event: &Event) -> Result<bool, DemoError> {
        match event {
            Event::Key {
                key: Key::Char('q'),
                ..
            } => return Ok(false),
            Event::Key {
                key: Key::Char('c'),
                modifiers,
            } if modifiers.ctrl => return Ok(false),
            Event::Key {
                key: Key::Char('d'),
                ..
            } => self.toggle_disabled()?,
            Event::Key {
                key: Key::Char('t'),
                ..
            } => self.cycle_label()?,
            other => self.page.handle_input(other)?,
        }
        self.update_status()?;
        Ok(true)
    }
}

fn run(config: &DemoConfig) -> Result<(), DemoError> {
    let mut demo = Demo::new(config)?;
    let mut terminal = Terminal::new()?;

    loop {
        terminal.render(&mut demo.page)?;
        for raw in terminal.poll(Some(POLL_INTERVAL))? {
            let Some(event) = Event::from_crossterm(&raw) else {
                continue;
            };
            if !demo.handle(&event)? {
                log::info!("[demo] exiting");
                return Ok(());
            }
        }
    }
}

fn main() -> ExitCode {
    let config = match DemoConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = init_logging(&config) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("[demo] {}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
