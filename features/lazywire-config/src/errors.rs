use lazywire_di::TypeInfo;

/// Errors when registering or retrieving a config
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No config of the requested type was registered
    #[error("Config '{0}' is not registered")]
    Missing(TypeInfo),
    /// A config of this type is already registered
    #[error("Config '{0}' is already registered")]
    AlreadyRegistered(TypeInfo),
}
