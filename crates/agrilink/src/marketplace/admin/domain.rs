use serde::Serialize;

/// Allow-list of auditable collections. Anything else is an invalid table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TableName {
    Users,
    Equipment,
    LabourJobs,
    JobApplications,
    EquipmentBookings,
    LabourerProfiles,
    MarketPrices,
}

impl TableName {
    pub const ALL: [TableName; 7] = [
        TableName::Users,
        TableName::Equipment,
        TableName::LabourJobs,
        TableName::JobApplications,
        TableName::EquipmentBookings,
        TableName::LabourerProfiles,
        TableName::MarketPrices,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            TableName::Users => "users",
            TableName::Equipment => "equipment",
            TableName::LabourJobs => "labour_jobs",
            TableName::JobApplications => "job_applications",
            TableName::EquipmentBookings => "equipment_bookings",
            TableName::LabourerProfiles => "labourer_profiles",
            TableName::MarketPrices => "market_prices",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|table| table.as_str() == value)
    }
}
