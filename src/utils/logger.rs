use env_logger::{Builder, Env};
use std::io::Write;

/// Initialize logging once at startup. Defaults to `info` for our own
/// output; `RUST_LOG` overrides as usual.
pub fn init_logger() {
    let env = Env::default().filter_or("RUST_LOG", "info");

    Builder::from_env(env)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {}: {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .target(env_logger::Target::Stderr)
        .init();
}
