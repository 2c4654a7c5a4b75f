//! Console log setup: `[INF]`, `[WRN]`, `[ERR]` prefixed lines via `colog`.

use colog::format::CologStyle;
use log::Level;

struct SeverityTagStyle;

impl CologStyle for SeverityTagStyle {
    fn level_token(&self, level: &Level) -> &str {
        match level {
            Level::Error => "ERR",
            Level::Warn => "WRN",
            Level::Info => "INF",
            Level::Debug => "DBG",
            Level::Trace => "TRC",
        }
    }
}

/// Installs the global logger; `RUST_LOG` still overrides the level.
pub fn init_logging() {
    let mut clog = colog::default_builder();
    clog.filter(None, log::LevelFilter::Info);
    clog.parse_default_env();
    clog.format(colog::formatter(SeverityTagStyle));
    clog.init();

    std::panic::set_hook(Box::new(|panic_info| {
        let current_thread = std::thread::current();
        let thread_name = current_thread.name().unwrap_or("unnamed");
        log::error!("panic in thread '{}': {}", thread_name, panic_info);
    }));
}
