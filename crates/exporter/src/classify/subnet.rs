use std::net::IpAddr;

use ipnet::IpNet;

use super::model::ClassifyError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum SubnetEntry {
    Parsed(IpNet),
    /// Kept as-is so the lookup can report it when reached
    Invalid(String),
}

/// Configured internal networks, checked in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InternalSubnets {
    entries: Vec<SubnetEntry>,
}

impl InternalSubnets {
    pub fn parse(subnets: &[String]) -> Self {
        let entries = subnets
            .iter()
            .map(|s| match s.trim().parse::<IpNet>() {
                Ok(net) => SubnetEntry::Parsed(net),
                Err(_) => SubnetEntry::Invalid(s.clone()),
            })
            .collect();

        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Subnets that did not parse as CIDR.
    pub fn invalid(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().filter_map(|e| match e {
            SubnetEntry::Invalid(s) => Some(s.as_str()),
            SubnetEntry::Parsed(_) => None,
        })
    }

    /// Whether `addr` lies in one of the subnets.
    ///
    /// Entries are walked in order and the first invalid one reached is an
    /// error, even if a later entry would have matched.
    pub fn contains(&self, addr: &str) -> Result<bool, ClassifyError> {
        if self.entries.is_empty() {
            return Ok(false);
        }

        let ip: IpAddr = addr
            .trim()
            .parse()
            .map_err(|e| ClassifyError::SubnetConfig(format!("invalid IP address {:?}: {}", addr, e)))?;

        for entry in &self.entries {
            match entry {
                SubnetEntry::Parsed(net) => {
                    if net.contains(&ip) {
                        return Ok(true);
                    }
                }
                SubnetEntry::Invalid(raw) => {
                    return Err(ClassifyError::SubnetConfig(format!("invalid CIDR address: {}", raw)));
                }
            }
        }

        Ok(false)
    }
}
