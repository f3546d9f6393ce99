//! Multi-step provisioning flows
//!
//! Steps run one after another without compensation: when one fails, the
//! ones before it stay applied and the error names both.

use crate::client::OciClient;
use crate::error::{OciError, OciResult};
use crate::types::{NewUser, ScaEndpointOptions, TestUser, UserData};
use bwks_request_core::DispatchError;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{error, info};

const INTEGRATED_IMP_SERVICE: &str = "Integrated IMP";
const PASSWORD_SYMBOLS: &[u8] = b"!#?.,";

/// Device name prefix: the initials of the lowercased type words, a number up to 100, `_`
///
/// `"Business Communicator - PC"` gives e.g. `bc-p42_`.
pub fn device_prefix(device_type: &str) -> String {
    let initials: String = device_type
        .to_lowercase()
        .split(' ')
        .filter_map(|word| word.chars().next())
        .collect();
    format!("{}{}_", initials, rand::thread_rng().gen_range(0..=100))
}

/// Random password accepted by the device management server
///
/// Three upper case letters, three lower case letters, three digits and
/// three of `!#?.,`.
pub fn qualified_password() -> String {
    let mut rng = rand::thread_rng();
    let sets: [&[u8]; 4] = [
        b"ABCDEFGHIJKLMNOPQRSTUVWXYZ",
        b"abcdefghijklmnopqrstuvwxyz",
        b"0123456789",
        PASSWORD_SYMBOLS,
    ];
    let mut password = String::with_capacity(12);
    for set in sets {
        for _ in 0..3 {
            if let Some(&c) = set.choose(&mut rng) {
                password.push(c as char);
            }
        }
    }
    password
}

/// Names of the steps completed so far
#[derive(Debug, Default)]
struct Progress {
    completed: Vec<String>,
}

impl Progress {
    fn record<T>(&mut self, step: &str, result: OciResult<T>) -> OciResult<T> {
        match result {
            Ok(value) => {
                info!(step, "provisioning step completed");
                self.completed.push(step.to_string());
                Ok(value)
            }
            Err(e) => {
                error!(step, completed = ?self.completed, error = %e, "provisioning step failed");
                Err(OciError::step_failed(step, self.completed.clone(), e))
            }
        }
    }
}

impl OciClient {
    /// Replace all devices of a user with new ones of the given types
    ///
    /// Every device add and endpoint add is its own step, so a failure names
    /// the devices already created.
    pub async fn provision_user_with_devices(
        &mut self,
        user_id: &str,
        primary_device_type: Option<&str>,
        sca_device_types: &[String],
    ) -> OciResult<()> {
        let (user_part, domain) = split_user_id(user_id)?;
        let mut progress = Progress::default();

        progress.record("delete devices", self.user_delete_all_devices(user_id).await)?;
        if let Some(device_type) = primary_device_type {
            let (device_name, line_port) = device_names(device_type, user_part, domain);
            progress.record(
                &format!("add device {}", device_name),
                self.group_access_device_add(&device_name, device_type, &device_name, &qualified_password())
                    .await,
            )?;
            progress.record(
                &format!("add primary endpoint {}", device_name),
                self.user_primary_endpoint_add(user_id, &device_name, &line_port)
                    .await,
            )?;
        }
        for device_type in sca_device_types {
            let (device_name, line_port) = device_names(device_type, user_part, domain);
            progress.record(
                &format!("add device {}", device_name),
                self.group_access_device_add(&device_name, device_type, &device_name, &qualified_password())
                    .await,
            )?;
            progress.record(
                &format!("add SCA endpoint {}", device_name),
                self.user_sca_endpoint_add(user_id, &device_name, &line_port, ScaEndpointOptions::default())
                    .await,
            )?;
        }
        info!(
            user = user_id,
            primary = primary_device_type.unwrap_or("none"),
            sca = sca_device_types.len(),
            "user provisioned with devices"
        );
        Ok(())
    }

    /// Delete a user and every access device it uses
    pub async fn delete_user_and_devices(&mut self, user_id: &str) -> OciResult<()> {
        let mut progress = Progress::default();
        progress.record("delete devices", self.user_delete_all_devices(user_id).await)?;
        progress.record("delete user", self.user_delete(user_id).await)?;
        Ok(())
    }

    /// Create a user in the default domain with a fresh number, IM&P and devices
    pub async fn create_test_user(&mut self, test_user: &TestUser) -> OciResult<UserData> {
        let mut progress = Progress::default();

        let default_domain = self.group_get_assigned_domains().await.and_then(|domains| {
            domains
                .into_iter()
                .next()
                .ok_or_else(|| OciError::missing_element("GroupDomainGetAssignedListResponse", "groupDefaultDomain"))
        });
        let domain = progress.record("get assigned domains", default_domain)?;
        let user_id = format!("{}@{}", test_user.user_part(), domain);

        let first_number = self.group_get_available_numbers().await.and_then(|numbers| {
            numbers
                .into_iter()
                .next()
                .ok_or_else(|| OciError::missing_element("GroupDnGetAvailableListResponse", "phoneNumber"))
        });
        let phone_number = progress.record("get available numbers", first_number)?;

        let new_user = NewUser::new(&user_id, &test_user.last_name, &test_user.first_name, &test_user.password)
            .with_calling_line_id(
                format!("{}{}", test_user.last_name, test_user.clid_suffix),
                format!("{}{}", test_user.first_name, test_user.clid_suffix),
            )
            .with_phone_number(&phone_number);
        let user = progress.record("add user", self.user_add(&new_user).await)?;

        progress.record("activate number", self.activate_number(&phone_number).await)?;
        progress.record(
            "assign Integrated IMP",
            self.user_assign_service(&user_id, &[INTEGRATED_IMP_SERVICE]).await,
        )?;
        progress.record("activate IMP", self.activate_imp(&user_id).await)?;
        progress.record(
            "provision devices",
            self.provision_user_with_devices(&user_id, test_user.primary_device.as_deref(), &test_user.sca_devices)
                .await,
        )?;
        progress.record("modify SCA settings", self.user_sca_modify(&user_id, true, false).await)?;

        info!(user = %user_id, phone_number = %phone_number, "test user created");
        Ok(user)
    }
}

/// `user@domain` split into its parts; both must be non-empty
fn split_user_id(user_id: &str) -> OciResult<(&str, &str)> {
    match user_id.rsplit_once('@') {
        Some((user_part, domain)) if !user_part.is_empty() && !domain.is_empty() => Ok((user_part, domain)),
        _ => Err(DispatchError::invalid_argument("userId", format!("'{}' is not of the form user@domain", user_id)).into()),
    }
}

fn device_names(device_type: &str, user_part: &str, domain: &str) -> (String, String) {
    let prefix = device_prefix(device_type);
    let device_name = format!("{}{}", prefix, user_part);
    let line_port = format!("lp_{}{}@{}", prefix, user_part, domain);
    (device_name, line_port)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_device_prefix_initials() {
        let prefix = device_prefix("Business Communicator - PC");
        assert!(prefix.starts_with("bc-p"));
        assert!(prefix.ends_with('_'));
        let number: u32 = prefix["bc-p".len()..prefix.len() - 1].parse().unwrap();
        assert!(number <= 100);
    }

    #[test]
    fn test_device_names() {
        let (device, line_port) = device_names("Polycom-550", "bob", "example.com");
        assert!(device.starts_with('p') && device.ends_with("_bob"));
        assert_eq!(line_port, format!("lp_{}@example.com", device));
    }

    #[test]
    fn test_split_user_id() {
        assert_eq!(split_user_id("alice@example.com").unwrap(), ("alice", "example.com"));
        for bad in ["alice", "alice@", "@example.com"] {
            let err = split_user_id(bad).unwrap_err();
            assert!(matches!(err, OciError::Dispatch(DispatchError::InvalidArgument { .. })));
            assert!(err.is_recoverable());
        }
    }

    #[test]
    fn test_progress_reports_completed_steps() {
        let mut progress = Progress::default();
        progress.record("first", Ok::<_, OciError>(())).unwrap();
        let err = progress
            .record::<()>("second", Err(OciError::transport("down")))
            .unwrap_err();
        match err {
            OciError::StepFailed { step, completed, .. } => {
                assert_eq!(step, "second");
                assert_eq!(completed, vec!["first".to_string()]);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    proptest! {
        #[test]
        fn qualified_password_has_every_class(_seed in 0u8..32) {
            let password = qualified_password();
            prop_assert_eq!(password.len(), 12);
            prop_assert_eq!(password.chars().filter(|c| c.is_ascii_uppercase()).count(), 3);
            prop_assert_eq!(password.chars().filter(|c| c.is_ascii_lowercase()).count(), 3);
            prop_assert_eq!(password.chars().filter(|c| c.is_ascii_digit()).count(), 3);
            prop_assert_eq!(password.chars().filter(|c| "!#?.,".contains(*c)).count(), 3);
        }
    }
}
