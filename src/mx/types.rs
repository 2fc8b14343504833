/// One mail exchanger. Ordering is by preference first, so a sorted list
/// starts with the host to contact.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct MxRecord {
    pub preference: u16,
    pub exchange: String,
}

impl MxRecord {
    pub fn new(preference: u16, exchange: impl Into<String>) -> Self {
        Self {
            preference,
            exchange: exchange.into(),
        }
    }
}

/// Answer for one domain. `NoRecords` means the domain exists for DNS but
/// publishes no mail exchanger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MxStatus {
    Records(Vec<MxRecord>),
    NoRecords,
}

impl MxStatus {
    /// Sorts by preference and drops duplicates.
    pub(crate) fn from_records(mut records: Vec<MxRecord>) -> Self {
        records.sort();
        records.dedup();
        if records.is_empty() {
            Self::NoRecords
        } else {
            Self::Records(records)
        }
    }

    pub fn records(&self) -> &[MxRecord] {
        match self {
            Self::Records(records) => records,
            Self::NoRecords => &[],
        }
    }
}
