//! Statusausgabe: Browser-Konsole im wasm-Build, sonst `tracing`.

pub fn log_status(s: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::log_1(&s.trim().into());
    #[cfg(not(target_arch = "wasm32"))]
    tracing::info!("{}", s.trim());
}

pub fn log_warnung(s: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::warn_1(&s.trim().into());
    #[cfg(not(target_arch = "wasm32"))]
    tracing::warn!("{}", s.trim());
}

pub fn log_fehler(s: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::error_1(&s.trim().into());
    #[cfg(not(target_arch = "wasm32"))]
    tracing::error!("{}", s.trim());
}

/// Gibt gesammelte Logzeilen aus, je nach Präfix "ERROR"/"WARNING" als Fehler oder Warnung
pub fn log_alle(log: &[String]) {
    for zeile in log {
        if zeile.starts_with("ERROR") {
            log_fehler(zeile);
        } else if zeile.starts_with("WARNING") {
            log_warnung(zeile);
        } else {
            log_status(zeile);
        }
    }
}
