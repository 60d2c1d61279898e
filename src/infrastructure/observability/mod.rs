mod init_tracing;
mod progress_bar;
mod secret_mask;
mod tracing_config;

pub use init_tracing::init_tracing;
pub use progress_bar::IndicatifProgress;
pub use secret_mask::mask_secret;
pub use tracing_config::TracingConfig;
