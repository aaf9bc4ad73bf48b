//! Spend category registry.
//!
//! One immutable table maps each category to its metadata. The workload
//! allocator, planned-workload input and recommendation rules all read from it.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use spendcast_core::DomainError;

/// Spend category identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpendCategory {
    Compute,
    Storage,
    Databases,
    Analytics,
    AiMl,
    Networking,
    Security,
    Containers,
}

impl SpendCategory {
    /// All categories, in allocation order.
    pub const ALL: [SpendCategory; 8] = [
        SpendCategory::Compute,
        SpendCategory::Storage,
        SpendCategory::Databases,
        SpendCategory::Analytics,
        SpendCategory::AiMl,
        SpendCategory::Networking,
        SpendCategory::Security,
        SpendCategory::Containers,
    ];

    pub fn profile(self) -> &'static CategoryProfile {
        &PROFILES[self as usize]
    }

    pub fn label(self) -> &'static str {
        self.profile().label
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SpendCategory::Compute => "compute",
            SpendCategory::Storage => "storage",
            SpendCategory::Databases => "databases",
            SpendCategory::Analytics => "analytics",
            SpendCategory::AiMl => "ai_ml",
            SpendCategory::Networking => "networking",
            SpendCategory::Security => "security",
            SpendCategory::Containers => "containers",
        }
    }
}

impl core::fmt::Display for SpendCategory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SpendCategory {
    type Err = DomainError;

    /// Accepts either the identifier (`ai_ml`) or the label (`AI/ML`), case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        SpendCategory::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(needle) || c.label().eq_ignore_ascii_case(needle))
            .ok_or_else(|| DomainError::invalid_input(format!("unknown spend category {needle:?}")))
    }
}

/// Descriptive metadata for a category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryProfile {
    pub category: SpendCategory,
    pub label: &'static str,
    pub description: &'static str,
    /// Representative services, most significant first.
    pub typical_services: [&'static str; 3],
    /// Assumed annual growth rate (percent) for the category.
    pub baseline_growth_rate: f64,
    /// Fraction of the total run rate attributed to this category.
    pub allocation_share: f64,
}

// Indexed by `SpendCategory as usize`; order must match the enum.
static PROFILES: [CategoryProfile; 8] = [
    CategoryProfile {
        category: SpendCategory::Compute,
        label: "Compute",
        description: "Virtual machines, serverless functions and batch compute",
        typical_services: ["Virtual Machines", "App Service", "Functions"],
        baseline_growth_rate: 15.0,
        allocation_share: 0.35,
    },
    CategoryProfile {
        category: SpendCategory::Storage,
        label: "Storage",
        description: "Object, block and file storage plus backup",
        typical_services: ["Blob Storage", "Managed Disks", "Backup"],
        baseline_growth_rate: 20.0,
        allocation_share: 0.15,
    },
    CategoryProfile {
        category: SpendCategory::Databases,
        label: "Databases",
        description: "Managed relational and NoSQL databases",
        typical_services: ["SQL Database", "Cosmos DB", "PostgreSQL"],
        baseline_growth_rate: 18.0,
        allocation_share: 0.20,
    },
    CategoryProfile {
        category: SpendCategory::Analytics,
        label: "Analytics",
        description: "Data warehousing, pipelines and big-data processing",
        typical_services: ["Synapse Analytics", "Data Factory", "Databricks"],
        baseline_growth_rate: 25.0,
        allocation_share: 0.10,
    },
    CategoryProfile {
        category: SpendCategory::AiMl,
        label: "AI/ML",
        description: "Hosted models, machine learning platforms and cognitive APIs",
        typical_services: ["OpenAI Service", "Machine Learning", "Cognitive Services"],
        baseline_growth_rate: 45.0,
        allocation_share: 0.08,
    },
    CategoryProfile {
        category: SpendCategory::Networking,
        label: "Networking",
        description: "Connectivity, load balancing and content delivery",
        typical_services: ["Virtual Network", "Load Balancer", "Front Door"],
        baseline_growth_rate: 10.0,
        allocation_share: 0.05,
    },
    CategoryProfile {
        category: SpendCategory::Security,
        label: "Security",
        description: "Threat protection, key management and identity",
        typical_services: ["Defender for Cloud", "Key Vault", "Sentinel"],
        baseline_growth_rate: 12.0,
        allocation_share: 0.04,
    },
    CategoryProfile {
        category: SpendCategory::Containers,
        label: "Containers",
        description: "Managed Kubernetes and container hosting",
        typical_services: ["Kubernetes Service", "Container Apps", "Container Registry"],
        baseline_growth_rate: 30.0,
        allocation_share: 0.03,
    },
];

/// Read-only view over the category table.
#[derive(Debug, Copy, Clone, Default)]
pub struct CategoryRegistry;

impl CategoryRegistry {
    pub fn standard() -> Self {
        Self
    }

    pub fn profile(&self, category: SpendCategory) -> &'static CategoryProfile {
        category.profile()
    }

    /// Profiles in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = &'static CategoryProfile> {
        PROFILES.iter()
    }

    /// Sum of allocation shares; less than 1.0 means part of the run rate is unassigned.
    pub fn assigned_share(&self) -> f64 {
        PROFILES.iter().map(|p| p.allocation_share).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_table_is_indexed_by_enum_order() {
        for (i, category) in SpendCategory::ALL.iter().enumerate() {
            assert_eq!(PROFILES[i].category, *category);
            assert_eq!(category.profile().category, *category);
        }
    }

    #[test]
    fn parses_identifier_and_label() {
        assert_eq!("ai_ml".parse::<SpendCategory>().unwrap(), SpendCategory::AiMl);
        assert_eq!("AI/ML".parse::<SpendCategory>().unwrap(), SpendCategory::AiMl);
        assert_eq!("compute".parse::<SpendCategory>().unwrap(), SpendCategory::Compute);
        assert!("mainframe".parse::<SpendCategory>().is_err());
    }

    #[test]
    fn assigned_share_leaves_no_overallocation() {
        let total = CategoryRegistry::standard().assigned_share();
        assert!(total <= 1.0 + 1e-9, "shares sum to {total}");
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn serde_uses_snake_case_ids() {
        let json = serde_json::to_string(&SpendCategory::AiMl).unwrap();
        assert_eq!(json, "\"ai_ml\"");
    }
}
