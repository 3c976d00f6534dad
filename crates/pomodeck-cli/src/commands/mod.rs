pub mod ai;
pub mod config;
pub mod run;
pub mod simulate;
pub mod sounds;

/// Current-thread runtime: the widget is driven from a single task.
pub fn runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}
