use crate::common::error::{FairShareError, error};
use drf::UserId;
use drf::resources::ResourceVector;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::Path;

const WILDCARD: &str = "*";

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct ClusterConfig {
    #[serde(default)]
    pub partitions: Vec<PartitionConfig>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartitionConfig {
    pub name: String,
    /// Users declared directly on the partition
    #[serde(default)]
    pub users: Vec<String>,
    /// Total schedulable capacity of the partition
    #[serde(default)]
    pub capacity: ResourceVector,
    #[serde(default)]
    pub queues: Vec<QueueConfig>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct QueueConfig {
    pub name: String,
    /// `<users> <groups>`, both parts comma separated
    #[serde(default)]
    pub submit_acl: String,
    #[serde(default)]
    pub admin_acl: String,
    #[serde(default)]
    pub limits: Vec<LimitConfig>,
    #[serde(default)]
    pub queues: Vec<QueueConfig>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct LimitConfig {
    #[serde(default)]
    pub users: Vec<String>,
    #[serde(default)]
    pub groups: Vec<String>,
}

/// Users part of an ACL; groups are not users and are skipped.
fn acl_users(acl: &str) -> impl Iterator<Item = &str> {
    let acl = acl.trim_end();
    let users = if acl.starts_with(' ') {
        ""
    } else {
        acl.split(' ').next().unwrap_or("")
    };
    users.split(',').map(str::trim)
}

fn is_user_name(name: &str) -> bool {
    !name.is_empty() && name != WILDCARD
}

impl QueueConfig {
    fn collect_users<'a>(&'a self, users: &mut BTreeSet<&'a str>) {
        users.extend(
            acl_users(&self.submit_acl)
                .chain(acl_users(&self.admin_acl))
                .chain(
                    self.limits
                        .iter()
                        .flat_map(|limit| limit.users.iter().map(|u| u.trim())),
                )
                .filter(|name| is_user_name(name)),
        );
        for child in &self.queues {
            child.collect_users(users);
        }
    }
}

impl PartitionConfig {
    /// Distinct users configured for the partition, sorted by name.
    pub fn users(&self) -> Vec<UserId> {
        let mut users: BTreeSet<&str> = self
            .users
            .iter()
            .map(|u| u.trim())
            .filter(|name| is_user_name(name))
            .collect();
        for queue in &self.queues {
            queue.collect_users(&mut users);
        }
        users.into_iter().map(UserId::from).collect()
    }

    fn validate(&self) -> crate::Result<()> {
        if self.name.trim().is_empty() {
            return Err(FairShareError::ConfigError(
                "Partition name must not be empty".into(),
            ));
        }
        if let Some((resource, amount)) = self.capacity.iter().find(|(_, a)| a.value() < 0) {
            return Err(FairShareError::ConfigError(format!(
                "Capacity of '{resource}' in partition '{}' is negative ({amount})",
                self.name
            )));
        }
        Ok(())
    }
}

impl ClusterConfig {
    pub fn parse(str: &str) -> crate::Result<ClusterConfig> {
        let config: ClusterConfig = toml::from_str(str)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> crate::Result<ClusterConfig> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    fn validate(&self) -> crate::Result<()> {
        let mut names = BTreeSet::new();
        for partition in &self.partitions {
            partition.validate()?;
            if !names.insert(partition.name.as_str()) {
                return Err(FairShareError::ConfigError(format!(
                    "Partition '{}' is defined more than once",
                    partition.name
                )));
            }
        }
        Ok(())
    }

    /// Finds the partition by name; without a name the configuration must contain
    /// exactly one partition.
    pub fn partition(&self, name: Option<&str>) -> crate::Result<&PartitionConfig> {
        match name {
            Some(name) => match self.partitions.iter().find(|p| p.name == name) {
                Some(partition) => Ok(partition),
                None => error(format!("Partition '{name}' not found")),
            },
            None => match self.partitions.as_slice() {
                [partition] => Ok(partition),
                [] => error("No partition is configured".to_string()),
                _ => error("Multiple partitions are configured, select one by name".to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(users: Vec<UserId>) -> Vec<String> {
        users.into_iter().map(|u| u.to_string()).collect()
    }

    #[test]
    fn test_parse_minimal_config() {
        let config = ClusterConfig::parse(
            r#"
        [[partitions]]
        name = "default"
        "#,
        )
        .unwrap();
        let partition = config.partition(None).unwrap();
        assert_eq!(partition.name, "default");
        assert!(partition.capacity.is_zero());
        assert!(partition.users().is_empty());
    }

    #[test]
    fn test_enumerate_users() {
        let config = ClusterConfig::parse(
            r#"
        [[partitions]]
        name = "default"
        users = ["carol", " ", "*"]

        [partitions.capacity]
        cpu = 100
        memory = 4096

        [[partitions.queues]]
        name = "root"
        submit_acl = "alice,bob admins"
        admin_acl = " ops"

        [[partitions.queues.queues]]
        name = "root.batch"
        submit_acl = "dave,alice"

        [[partitions.queues.queues.limits]]
        users = ["erin", "*"]
        groups = ["dev"]

        [[partitions.queues.queues]]
        name = "root.any"
        submit_acl = "*"
        "#,
        )
        .unwrap();
        let partition = config.partition(Some("default")).unwrap();
        assert_eq!(
            names(partition.users()),
            vec!["alice", "bob", "carol", "dave", "erin"]
        );
        assert_eq!(partition.capacity.get("cpu").value(), 100);
        assert_eq!(partition.capacity.get("memory").value(), 4096);
    }

    #[test]
    fn test_select_partition() {
        let config = ClusterConfig::parse(
            r#"
        [[partitions]]
        name = "a"
        [[partitions]]
        name = "b"
        "#,
        )
        .unwrap();
        assert!(config.partition(None).is_err());
        assert_eq!(config.partition(Some("b")).unwrap().name, "b");
        assert!(config.partition(Some("c")).is_err());
        assert!(ClusterConfig::default().partition(None).is_err());
    }

    #[test]
    fn test_invalid_configs() {
        let duplicate = ClusterConfig::parse(
            r#"
        [[partitions]]
        name = "a"
        [[partitions]]
        name = "a"
        "#,
        );
        assert!(matches!(duplicate, Err(FairShareError::ConfigError(_))));

        let negative = ClusterConfig::parse(
            r#"
        [[partitions]]
        name = "a"
        capacity = { cpu = -1 }
        "#,
        );
        assert!(matches!(negative, Err(FairShareError::ConfigError(_))));

        let unnamed = ClusterConfig::parse(
            r#"
        [[partitions]]
        name = ""
        "#,
        );
        assert!(matches!(unnamed, Err(FairShareError::ConfigError(_))));

        let unknown = ClusterConfig::parse(
            r#"
        [[partitions]]
        name = "a"
        color = "red"
        "#,
        );
        assert!(matches!(
            unknown,
            Err(FairShareError::DeserializationError(_))
        ));
    }
}
