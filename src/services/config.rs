//! Config service
//!
//! Keeps a cached view of the store's values and type metadata, seals and
//! opens token values, and only changes the cache after the store has
//! confirmed a write.

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::crypto::{decrypt_token, encrypt_token, looks_like_envelope, SecureString};
use crate::display::mask_secret;
use crate::error::{SealError, SealResult};
use crate::models::{
    value_to_text, Access, ConfigType, EntryState, EntryView, KeyGroup, TypeInfo, TypeSource,
};
use crate::storage::{ConfigMap, ConfigStore, TypeMap};

use super::events::{ConfigEvent, ConfigObserver, EventBus};
use super::type_inference::resolve_type_info;
use super::validation::{validate_key, validate_value};

/// A value handed out for one read, edit or copy
#[derive(Debug, Clone)]
pub struct Revealed {
    pub key: String,
    pub config_type: ConfigType,
    /// `Plain` or `EncryptedUnlocked`
    pub state: EntryState,
    pub value: SecureString,
}

/// Service for reading and changing config entries
pub struct ConfigService<S: ConfigStore> {
    store: S,
    values: ConfigMap,
    types: TypeMap,
    events: EventBus,
}

impl<S: ConfigStore> ConfigService<S> {
    /// Create a service with an empty cache
    pub fn new(store: S) -> Self {
        Self {
            store,
            values: ConfigMap::new(),
            types: TypeMap::new(),
            events: EventBus::new(),
        }
    }

    /// Create a service and load the store's current contents
    pub fn open(store: S) -> SealResult<Self> {
        let mut service = Self::new(store);
        service.load()?;
        Ok(service)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Register an observer for confirmed actions
    pub fn subscribe(&mut self, observer: Box<dyn ConfigObserver>) {
        self.events.subscribe(observer);
    }

    /// Replace the cache with the store's values and metadata
    pub fn load(&mut self) -> SealResult<usize> {
        debug!("fetching config values and types");
        let values = self.store.get_all()?;
        let types = self.store.get_types()?;

        for (key, value) in &values {
            let sealed = types.get(key).is_some_and(TypeInfo::is_sealed);
            if sealed && !value.as_str().is_some_and(looks_like_envelope) {
                warn!(key = %key, "entry is marked encrypted but does not hold an envelope");
            }
        }

        let count = values.len();
        self.values = values;
        self.types = types;

        debug!(entries = count, "config loaded");
        self.events.emit(&ConfigEvent::Loaded { entries: count });
        Ok(count)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Type metadata of an entry and whether it was stored or inferred
    pub fn type_info(&self, key: &str) -> Option<(TypeInfo, TypeSource)> {
        let value = self.values.get(key)?;
        Some(resolve_type_info(key, value, self.types.get(key)))
    }

    /// Lock state of an entry as held in the cache
    ///
    /// Sealed entries always report `EncryptedLocked` here; an unlocked value
    /// only exists inside the [`Revealed`] returned by [`Self::reveal`].
    pub fn state(&self, key: &str) -> Option<EntryState> {
        self.type_info(key).map(|(info, _)| info.initial_state())
    }

    /// Snapshot of one entry
    pub fn entry(&self, key: &str) -> Option<EntryView> {
        let (key, value) = self.values.get_key_value(key)?;
        Some(self.view(key, value))
    }

    /// Every entry, sorted by key
    pub fn entries(&self) -> Vec<EntryView> {
        self.values
            .iter()
            .map(|(key, value)| self.view(key, value))
            .collect()
    }

    fn view(&self, key: &str, value: &Value) -> EntryView {
        let (type_info, source) = resolve_type_info(key, value, self.types.get(key));
        EntryView {
            key: key.to_string(),
            type_info,
            source,
            state: type_info.initial_state(),
            value: value.clone(),
        }
    }

    /// Create or replace an entry
    ///
    /// Only tokens are sealed: `encrypt` is ignored for every other type.
    /// Sealing without a usable password fails before anything is encrypted
    /// or sent to the store.
    pub fn save(
        &mut self,
        key: &str,
        value: &str,
        config_type: ConfigType,
        encrypt: bool,
        password: Option<&SecureString>,
    ) -> SealResult<TypeInfo> {
        let key = validate_key(key)?;
        validate_value(value, config_type)?;
        if config_type == ConfigType::KeyGroup {
            self.check_group_members(&key, &KeyGroup::parse(value)?)?;
        }

        let seal = encrypt && config_type.supports_encryption();
        if encrypt && !seal {
            debug!(key = %key, config_type = %config_type, "encryption only applies to tokens; saving as plain");
        }

        let (stored, type_info) = if seal {
            let password = require_password(password, &key, "encrypt")?;
            (encrypt_token(value, password)?, TypeInfo::sealed_token())
        } else {
            (value.to_string(), TypeInfo::plain(config_type))
        };

        debug!(key = %key, config_type = %config_type, encrypted = seal, "saving config entry");
        if let Err(e) = self.store.save(&key, &stored, type_info) {
            warn!(key = %key, error = %e, "store rejected save");
            return Err(e);
        }

        let cached = if seal {
            Value::String(stored)
        } else {
            config_type
                .convert(value)
                .unwrap_or_else(|| Value::String(value.to_string()))
        };
        let created = self.values.insert(key.clone(), cached).is_none();
        self.types.insert(key.clone(), type_info);

        info!(key = %key, config_type = %config_type, encrypted = seal, created, "config entry saved");
        self.events.emit(&ConfigEvent::Saved {
            key,
            type_info,
            created,
        });
        Ok(type_info)
    }

    /// Replace the value of an existing entry, keeping its type
    ///
    /// A sealed entry must be unlocked with `password` first.
    pub fn update(
        &mut self,
        key: &str,
        value: &str,
        encrypt: bool,
        password: Option<&SecureString>,
    ) -> SealResult<TypeInfo> {
        let (type_info, _) = self
            .type_info(key)
            .ok_or_else(|| SealError::entry_not_found(key))?;

        if type_info.is_sealed() {
            self.reveal(key, Access::Edit, password)?;
        }

        self.save(key, value, type_info.config_type, encrypt, password)
    }

    /// Hand out an entry's value for one access
    ///
    /// Plain entries are returned as stored. Sealed entries need a password;
    /// a missing one is rejected before any decryption is attempted, and a
    /// wrong one leaves the entry locked. Ciphertext is never returned.
    pub fn reveal(
        &self,
        key: &str,
        access: Access,
        password: Option<&SecureString>,
    ) -> SealResult<Revealed> {
        let value = self
            .values
            .get(key)
            .ok_or_else(|| SealError::entry_not_found(key))?;
        let (type_info, _) = resolve_type_info(key, value, self.types.get(key));

        if !type_info.is_sealed() {
            return Ok(Revealed {
                key: key.to_string(),
                config_type: type_info.config_type,
                state: EntryState::Plain,
                value: SecureString::new(value_to_text(value)),
            });
        }

        let password = require_password(password, key, &access.to_string())?;
        let envelope = value.as_str().ok_or(SealError::Decryption)?;

        let plaintext = decrypt_token(envelope, password).map_err(|e| {
            warn!(key = %key, access = %access, "could not unlock entry");
            e
        })?;

        info!(key = %key, access = %access, "entry unlocked");
        self.events.emit(&ConfigEvent::Unlocked {
            key: key.to_string(),
            access,
        });

        Ok(Revealed {
            key: key.to_string(),
            config_type: type_info.config_type,
            state: EntryState::EncryptedUnlocked,
            value: plaintext.into(),
        })
    }

    /// Text to put on the clipboard for an entry
    ///
    /// Key groups produce one `key: value` line per member with sealed
    /// members masked.
    pub fn copy_value(&self, key: &str, password: Option<&SecureString>) -> SealResult<SecureString> {
        let (type_info, _) = self
            .type_info(key)
            .ok_or_else(|| SealError::entry_not_found(key))?;

        if type_info.config_type != ConfigType::KeyGroup {
            return Ok(self.reveal(key, Access::Copy, password)?.value);
        }

        let group = self.key_group(key)?;
        let lines: Vec<String> = group
            .keys()
            .into_iter()
            .map(|member| {
                let text = match self.values.get(member) {
                    None => String::new(),
                    Some(value) if self.is_sealed(member, value) => {
                        mask_secret(&value_to_text(value))
                    }
                    Some(value) => value_to_text(value),
                };
                format!("{}: {}", member, text)
            })
            .collect();

        Ok(SecureString::new(lines.join("\n")))
    }

    /// The group stored under `key`
    pub fn key_group(&self, key: &str) -> SealResult<KeyGroup> {
        let (type_info, _) = self
            .type_info(key)
            .ok_or_else(|| SealError::entry_not_found(key))?;
        if type_info.config_type != ConfigType::KeyGroup {
            return Err(SealError::Validation(format!(
                "'{}' is not a key group",
                key
            )));
        }

        let raw = self.values.get(key).map(value_to_text).unwrap_or_default();
        KeyGroup::parse(&raw)
    }

    /// Values of the three keys a group points at
    ///
    /// Empty slots and dangling references resolve to empty strings. Sealed
    /// members are decrypted with `password`.
    pub fn resolve_key_group(
        &self,
        key: &str,
        password: Option<&SecureString>,
    ) -> SealResult<Vec<SecureString>> {
        let group = self.key_group(key)?;

        let needs_password = group
            .keys()
            .into_iter()
            .any(|member| matches!(self.values.get(member), Some(v) if self.is_sealed(member, v)));
        if needs_password {
            require_password(password, key, "resolve")?;
        }

        group
            .slots()
            .into_iter()
            .map(|slot| match slot {
                Some(member) if self.values.contains_key(member) => {
                    Ok(self.reveal(member, Access::Read, password)?.value)
                }
                _ => Ok(SecureString::new(String::new())),
            })
            .collect()
    }

    /// Store a group pointing at up to three existing keys
    pub fn save_key_group<K: AsRef<str>>(&mut self, key: &str, members: &[K]) -> SealResult<TypeInfo> {
        let group = KeyGroup::new(members)?;
        self.save(key, &group.to_json(), ConfigType::KeyGroup, false, None)
    }

    /// Members must be other existing keys
    fn check_group_members(&self, key: &str, group: &KeyGroup) -> SealResult<()> {
        for member in group.keys() {
            if member == key {
                return Err(SealError::Validation(format!(
                    "Key group '{}' cannot contain itself",
                    key
                )));
            }
            if !self.values.contains_key(member) {
                return Err(SealError::entry_not_found(member));
            }
        }
        Ok(())
    }

    /// Remove an entry whatever its lock state
    pub fn delete(&mut self, key: &str) -> SealResult<()> {
        let key = validate_key(key)?;

        debug!(key = %key, "deleting config entry");
        if let Err(e) = self.store.delete(&key) {
            warn!(key = %key, error = %e, "store rejected delete");
            return Err(e);
        }

        self.values.remove(&key);
        let type_info = self.types.remove(&key);

        info!(key = %key, "config entry deleted");
        self.events.emit(&ConfigEvent::Deleted { key, type_info });
        Ok(())
    }

    fn is_sealed(&self, key: &str, value: &Value) -> bool {
        resolve_type_info(key, value, self.types.get(key)).0.is_sealed()
    }
}

fn require_password<'p>(
    password: Option<&'p SecureString>,
    key: &str,
    action: &str,
) -> SealResult<&'p SecureString> {
    match password {
        Some(password) if !password.is_empty() => Ok(password),
        _ => {
            warn!(key = %key, action, "password required but not provided");
            Err(SealError::Precondition(format!(
                "A password is required to {} '{}'",
                action, key
            )))
        }
    }
}
