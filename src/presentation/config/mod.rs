mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    BrokerSettings, LoggingSettings, Settings, StorageProviderSetting, StorageSettings,
    TransferSettings,
};
