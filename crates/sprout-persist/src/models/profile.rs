use serde::{Deserialize, Serialize};

/// Structured profile context attached to every user turn
///
/// Validated by serde at the request boundary; the orchestrator and the
/// ledger only ever see this typed form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileContext {
    pub child_age: String,
    pub child_personality: String,
    pub kindergarten: String,
    pub interests: String,
    pub languages: String,
    pub family_members: i32,
    pub has_siblings: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub siblings_age: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_uses_camel_case_wire_format() {
        let json = r#"{
            "childAge": "4",
            "childPersonality": "curious",
            "kindergarten": "yes",
            "interests": "dinosaurs",
            "languages": "english",
            "familyMembers": 3,
            "hasSiblings": "no"
        }"#;
        let profile: ProfileContext = serde_json::from_str(json).unwrap();
        assert_eq!(profile.child_age, "4");
        assert_eq!(profile.family_members, 3);
        assert!(profile.siblings_age.is_none());

        let out = serde_json::to_value(&profile).unwrap();
        assert!(out.get("childAge").is_some());
        assert!(out.get("siblingsAge").is_none());
    }
}
