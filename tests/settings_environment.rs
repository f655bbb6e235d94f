// Kept apart from the other settings tests, since environment variables
// are shared by every test in a binary.

use std::io;
use std::sync::{Arc, Mutex};

use rawquery::prelude::*;
use tracing::Level;

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().expect("log buffer").extend_from_slice(buf);
        Ok(buf.len())
    }
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn environment_overrides_scalars_and_lists() {
    unsafe {
        std::env::set_var("RAWQUERY__OBJECTS__SENTINEL", "HEADER");
        std::env::set_var("RAWQUERY__SCOPE__CATEGORIES", "WORD,TRANSLATION");
    }
    let settings = Settings::from_toml("[scope]\nitem_prefix = \"ITEM_\"\n");
    unsafe {
        std::env::remove_var("RAWQUERY__OBJECTS__SENTINEL");
        std::env::remove_var("RAWQUERY__SCOPE__CATEGORIES");
    }
    let settings = settings.expect("valid settings");
    assert_eq!(settings.objects.sentinel(), "HEADER");
    assert_eq!(settings.scope.categories(), ["WORD", "TRANSLATION"], "comma separated list");
    assert_eq!(settings.scope.item_prefix(), "ITEM_", "file values survive");
}

#[test]
fn loading_inline_settings_is_logged() {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::with_default(subscriber, || Settings::from_toml(""))
        .expect("valid settings");
    let logged = String::from_utf8(captured.0.lock().expect("log buffer").clone()).expect("utf8");
    assert!(logged.contains("settings loaded"), "got: {}", logged);
    assert!(logged.contains("origin=\"inline\"") || logged.contains("origin=inline"));
}
