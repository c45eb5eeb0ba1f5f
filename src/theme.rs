// Theme state: light/dark flag, derived palette, background persistence.
//
// The provider is built once at the application root and handed to whatever
// renders. Storage is read only at construction; afterwards the in-memory
// value is authoritative and every toggle is mirrored to storage by a writer
// thread, in toggle order.

use crate::repository::PaymentRepository;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }

    pub fn palette(self) -> Palette {
        let is_dark = self == ThemeMode::Dark;

        Palette {
            background: if is_dark { "#1a1a1a" } else { "#f8fafc" },
            text: if is_dark { "#ffffff" } else { "#1e293b" },
            card: if is_dark { "#2d2d2d" } else { "#ffffff" },
            border: if is_dark { "#404040" } else { "#e5e5e5" },
            primary: "#6366f1",
            secondary: if is_dark { "#818cf8" } else { "#e0e7ff" },
        }
    }
}

impl FromStr for ThemeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            other => Err(format!("unknown theme mode: {}", other)),
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hex colors for one theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Palette {
    pub background: &'static str,
    pub text: &'static str,
    pub card: &'static str,
    pub border: &'static str,
    pub primary: &'static str,
    pub secondary: &'static str,
}

enum PersistCommand {
    Save(ThemeMode),
    Flush(Sender<()>),
}

/// Owned theme state with a toggle
pub struct ThemeProvider {
    mode: ThemeMode,
    persist_tx: Option<Sender<PersistCommand>>,
    writer: Option<JoinHandle<()>>,
}

impl ThemeProvider {
    /// Load the stored flag and start the persistence writer
    pub fn load(repository: PaymentRepository) -> Self {
        let mode = repository.theme_mode();
        tracing::debug!(theme = %mode, "theme loaded");

        let (persist_tx, persist_rx) = mpsc::channel();
        let writer = thread::Builder::new()
            .name("theme-writer".to_string())
            .spawn(move || run_writer(repository, persist_rx));

        let (persist_tx, writer) = match writer {
            Ok(handle) => (Some(persist_tx), Some(handle)),
            Err(e) => {
                tracing::error!(error = %e, "Failed to start theme writer, changes will not persist");
                (None, None)
            }
        };

        Self {
            mode,
            persist_tx,
            writer,
        }
    }

    pub fn current(&self) -> ThemeMode {
        self.mode
    }

    pub fn is_dark(&self) -> bool {
        self.mode == ThemeMode::Dark
    }

    pub fn colors(&self) -> Palette {
        self.mode.palette()
    }

    /// Flip the theme; the new value is persisted in the background
    pub fn toggle(&mut self) -> ThemeMode {
        self.mode = self.mode.toggled();

        if let Some(tx) = &self.persist_tx {
            if tx.send(PersistCommand::Save(self.mode)).is_err() {
                tracing::error!("Theme writer stopped, theme change not persisted");
            }
        }

        self.mode
    }

    /// Block until every scheduled persist has run
    pub fn flush(&self) {
        let Some(tx) = &self.persist_tx else {
            return;
        };

        let (done_tx, done_rx) = mpsc::channel();
        if tx.send(PersistCommand::Flush(done_tx)).is_ok() {
            let _ = done_rx.recv();
        }
    }
}

impl Drop for ThemeProvider {
    fn drop(&mut self) {
        // closing the channel lets the writer drain and exit
        self.persist_tx.take();
        if let Some(handle) = self.writer.take() {
            let _ = handle.join();
        }
    }
}

fn run_writer(repository: PaymentRepository, commands: Receiver<PersistCommand>) {
    for command in commands {
        match command {
            PersistCommand::Save(mode) => {
                if let Err(e) = repository.set_theme_mode(mode) {
                    tracing::error!(error = %e, theme = %mode, "Error saving theme mode");
                }
            }
            PersistCommand::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::THEME_KEY;
    use crate::store::{KeyValueStore, MemoryStore, SqliteStore};
    use std::sync::Arc;

    #[test]
    fn test_defaults_to_light() {
        let repo = PaymentRepository::new(Arc::new(MemoryStore::new()));
        let theme = ThemeProvider::load(repo);

        assert_eq!(theme.current(), ThemeMode::Light);
        assert!(!theme.is_dark());
    }

    #[test]
    fn test_toggle_persists_across_restart() {
        let store = Arc::new(MemoryStore::new());

        let mut theme = ThemeProvider::load(PaymentRepository::new(store.clone()));
        assert_eq!(theme.toggle(), ThemeMode::Dark);
        assert_eq!(theme.current(), ThemeMode::Dark);
        theme.flush();
        drop(theme);

        assert_eq!(store.get(THEME_KEY).unwrap().as_deref(), Some("dark"));

        let restarted = ThemeProvider::load(PaymentRepository::new(store));
        assert_eq!(restarted.current(), ThemeMode::Dark);
    }

    #[test]
    fn test_persists_in_toggle_order() {
        let store = Arc::new(SqliteStore::open_in_memory().unwrap());
        let mut theme = ThemeProvider::load(PaymentRepository::new(store.clone()));

        for _ in 0..5 {
            theme.toggle();
        }
        theme.flush();

        assert_eq!(theme.current(), ThemeMode::Dark);
        assert_eq!(store.get(THEME_KEY).unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn test_storage_not_consulted_after_load() {
        let store = Arc::new(MemoryStore::new());
        let theme = ThemeProvider::load(PaymentRepository::new(store.clone()));

        store.set(THEME_KEY, "dark").unwrap();

        assert_eq!(theme.current(), ThemeMode::Light);
    }

    #[test]
    fn test_palette_follows_mode() {
        let light = ThemeMode::Light.palette();
        assert_eq!(light.background, "#f8fafc");
        assert_eq!(light.text, "#1e293b");
        assert_eq!(light.secondary, "#e0e7ff");

        let dark = ThemeMode::Dark.palette();
        assert_eq!(dark.background, "#1a1a1a");
        assert_eq!(dark.card, "#2d2d2d");
        assert_eq!(dark.border, "#404040");
        assert_eq!(dark.secondary, "#818cf8");

        assert_eq!(light.primary, dark.primary);
    }

    #[test]
    fn test_mode_strings() {
        assert_eq!("dark".parse::<ThemeMode>(), Ok(ThemeMode::Dark));
        assert_eq!("light".parse::<ThemeMode>(), Ok(ThemeMode::Light));
        assert!("Dark".parse::<ThemeMode>().is_err());
        assert_eq!(ThemeMode::Light.toggled(), ThemeMode::Dark);
        assert_eq!(
            serde_json::to_string(&ThemeMode::Dark).unwrap(),
            "\"dark\""
        );
    }
}
