use std::path::Path;
use std::sync::OnceLock;

use app::logging::LOG_FILE;
use color_eyre::Result;
use tracing::error;

static INIT: OnceLock<()> = OnceLock::new();

/// Install the color-eyre report and panic hooks. Reports point at the log
/// files in `log_dir`. Only the first call has an effect.
pub fn init(log_dir: &Path) -> Result<()> {
    if INIT.set(()).is_err() {
        return Ok(());
    }

    let section = panic_section(log_dir);
    let hooks = color_eyre::config::HookBuilder::default()
        .panic_section(section.clone())
        .capture_span_trace_by_default(false)
        .display_location_section(false)
        .display_env_section(false)
        .try_into_hooks()?;

    let (panic_hook, eyre_hook) = hooks;
    eyre_hook.install()?;

    std::panic::set_hook(Box::new(move |panic_info| {
        #[cfg(not(debug_assertions))]
        {
            use human_panic::{handle_dump, metadata, print_msg};
            let metadata = metadata!().support(section.clone());
            let file_path = handle_dump(&metadata, panic_info);
            if print_msg(file_path, &metadata).is_err() {
                eprintln!("human-panic: printing error message to console failed");
            }
            eprintln!("{}", panic_hook.panic_report(panic_info));
        }
        let msg = format!("{}", panic_hook.panic_report(panic_info));
        error!("Error: {}", strip_ansi_escapes::strip_str(msg));

        #[cfg(debug_assertions)]
        {
            better_panic::Settings::auto()
                .most_recent_first(false)
                .lineno_suffix(true)
                .verbosity(better_panic::Verbosity::Full)
                .create_panic_handler()(panic_info);
        }

        std::process::exit(libc::EXIT_FAILURE);
    }));

    Ok(())
}

fn panic_section(log_dir: &Path) -> String {
    format!(
        "todo crashed. Please attach the latest {LOG_FILE}.* from {} to your report.",
        log_dir.display()
    )
}
