use serde::{Deserialize, Serialize};

use crate::config::CreateAppPermission;

/// Response of `GET /space.json`. Extra fields the API returns are ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpaceInfo {
    pub id: String,
    pub name: String,
    pub is_private: bool,
    #[serde(default)]
    pub fixed_member: bool,
    pub permissions: SpacePermissions,
    #[serde(default)]
    pub creator: Option<UserRef>,
    #[serde(default)]
    pub modifier: Option<UserRef>,
    #[serde(default)]
    pub attached_apps: Vec<AttachedApp>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpacePermissions {
    pub create_app: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserRef {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachedApp {
    pub app_id: String,
    pub name: String,
}

/// Body of `POST /space.json` / `POST /template/space.json`. `fixed_member`
/// is serialized even when unset (as JSON null), mirroring what the API
/// accepts; `name`, `id` and `is_guest` are dropped when absent.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSpaceRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub is_private: bool,
    pub fixed_member: Option<bool>,
    pub permissions: Permissions,
    pub members: Vec<Member>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_guest: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Permissions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_app: Option<CreateAppPermission>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub entity: Entity,
    pub is_admin: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Entity {
    #[serde(rename = "type")]
    pub entity_type: String,
    pub code: String,
}

/// Body of `PUT /space.json`. Only the fields being changed are sent.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSpaceRequest {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed_member: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Permissions>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatedSpace {
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn space_info_reads_expected_fields() {
        let info: SpaceInfo = serde_json::from_str(
            r#"{
                "id": "12",
                "name": "営業部",
                "isPrivate": false,
                "fixedMember": true,
                "permissions": {"createApp": "ADMIN"},
                "creator": {"code": "taro", "name": "田中 太郎"},
                "modifier": null,
                "attachedApps": [
                    {"appId": "101", "name": "案件管理", "threadId": "9"}
                ],
                "body": "<p>ignored</p>"
            }"#,
        )
        .unwrap();
        assert_eq!(info.id, "12");
        assert!(info.fixed_member);
        assert_eq!(info.permissions.create_app, "ADMIN");
        assert_eq!(info.attached_apps.len(), 1);
        assert_eq!(info.attached_apps[0].app_id, "101");
        assert!(info.modifier.is_none());
    }

    #[test]
    fn update_request_only_carries_changed_fields() {
        let body = UpdateSpaceRequest {
            id: "12".to_string(),
            name: None,
            fixed_member: Some(false),
            permissions: None,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["id"], "12");
        assert_eq!(value["fixedMember"], false);
        assert!(value.get("name").is_none());
        assert!(value.get("permissions").is_none());
    }
}
