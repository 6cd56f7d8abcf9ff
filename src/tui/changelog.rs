pub const VERSION: &str = concat!("v", env!("CARGO_PKG_VERSION"));

pub struct Release {
    pub version: &'static str,
    pub changes: &'static [&'static str],
}

/// Newest first.
pub const RELEASES: &[Release] = &[
    Release {
        version: "v1.0.2",
        changes: &[
            "Soft animated background",
            "Natural feedback when pressing buttons",
            "Scrollable update history",
            "Removed the \"coming next\" section",
        ],
    },
    Release {
        version: "v1.0.1",
        changes: &[
            "Gentle fade-in when adding items",
            "New \"Gowun Dodum\" font",
            "Automatic \"last updated\" date",
        ],
    },
    Release {
        version: "v1.0.0",
        changes: &[
            "Items are now checkboxes",
            "Delete mode and delete all",
            "Refreshed design",
            "Version label and update history popup",
        ],
    },
];
