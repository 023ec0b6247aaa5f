use colored::Colorize;

use crate::client::KintoneClient;
use crate::config::Config;
use crate::error::Result;
use crate::prompt::Confirm;
use crate::space::{
    CreateSpaceRequest, Entity, Member, Permissions, SpaceInfo, UpdateSpaceRequest,
};

/// Outcome of the update flow. Declines and the missing-fields case are
/// normal returns, not failures.
#[derive(Debug, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated,
    Cancelled,
    NothingToUpdate,
}

pub async fn show_space(
    client: &KintoneClient,
    config: &Config,
    space_id: &str,
) -> Result<SpaceInfo> {
    println!("スペースID「{space_id}」の情報を表示しています...");
    let info = client.get_space(space_id).await?;

    println!("スペース情報:");
    println!("  スペース名: {}", info.name);
    println!("  スペースID: {}", info.id);
    println!("  ゲストスペース: {}", yes_no(config.guest));
    println!(
        "  スペースの状態: {}",
        if info.is_private { "非公開" } else { "公開" }
    );
    println!("  メンバー固定: {}", yes_no(info.fixed_member));
    println!("  アプリ作成権限: {}", info.permissions.create_app);
    if let Some(creator) = &info.creator {
        println!("  作成者: {} ({})", creator.name, creator.code);
    }
    if let Some(modifier) = &info.modifier {
        println!("  更新者: {} ({})", modifier.name, modifier.code);
    }

    if info.attached_apps.is_empty() {
        println!("  スペース内のアプリはありません。");
    } else {
        println!("  スペース内のアプリ:");
        for (index, app) in info.attached_apps.iter().enumerate() {
            println!("    {}. {} (ID: {})", index + 1, app.name, app.app_id);
        }
    }

    Ok(info)
}

pub async fn create_space(client: &KintoneClient, config: &Config) -> Result<String> {
    let name = config.space_name.as_deref().unwrap_or_default();
    println!("スペース「{name}」を作成しています...");

    let request = build_create_request(config);
    let created = client.create_space(&request).await?;

    println!("作成されたスペース「{name}」のID: {}", created.id);
    Ok(created.id)
}

pub async fn update_space(
    client: &KintoneClient,
    config: &Config,
    confirm: &dyn Confirm,
    space_id: &str,
) -> Result<UpdateOutcome> {
    if nothing_to_update(config) {
        eprintln!(
            "{}",
            "更新項目が指定されていません。spaceName、fixedMemberまたはcreateAppPermissionを指定してください。"
                .red()
        );
        return Ok(UpdateOutcome::NothingToUpdate);
    }

    println!("スペースID「{space_id}」を更新しています...");
    let request = build_update_request(config, space_id);
    let current = show_space(client, config, space_id).await?;

    println!();
    println!("更新内容:");
    if let Some(name) = &config.space_name {
        println!("  スペース名: {} -> {}", current.name, name);
    }
    if let Some(fixed) = config.fixed_member {
        println!(
            "  メンバー固定: {} -> {}",
            yes_no(current.fixed_member),
            yes_no(fixed)
        );
    }
    if let Some(permission) = config.create_app_permission {
        println!(
            "  アプリ作成権限: {} -> {}",
            current.permissions.create_app,
            permission.as_str()
        );
    }

    if confirm.confirm("このスペースを更新してもよろしいですか？ (yes/no): ")? {
        client.update_space(&request).await?;
        println!("スペースID「{space_id}」が正常に更新されました。");
        Ok(UpdateOutcome::Updated)
    } else {
        println!("スペースの更新をキャンセルしました。");
        Ok(UpdateOutcome::Cancelled)
    }
}

pub async fn delete_space(
    client: &KintoneClient,
    config: &Config,
    confirm: &dyn Confirm,
    space_id: &str,
) -> Result<()> {
    show_space(client, config, space_id).await?;

    if confirm.confirm("このスペースを削除してもよろしいですか？ (yes/no): ")? {
        println!("スペースID「{space_id}」を削除しています...");
        client.delete_space(space_id).await?;
        println!("スペースID「{space_id}」が正常に削除されました。");
    } else {
        println!("スペースの削除をキャンセルしました。");
    }
    Ok(())
}

fn nothing_to_update(config: &Config) -> bool {
    config.space_name.is_none()
        && config.fixed_member.is_none()
        && config.create_app_permission.is_none()
}

fn build_create_request(config: &Config) -> CreateSpaceRequest {
    CreateSpaceRequest {
        id: config.template_id.clone(),
        name: config.space_name.clone(),
        is_private: false,
        fixed_member: config.fixed_member,
        permissions: Permissions {
            create_app: config.create_app_permission,
        },
        members: vec![Member {
            entity: Entity {
                entity_type: "USER".to_string(),
                code: config.username.clone(),
            },
            is_admin: true,
        }],
        is_guest: config.guest,
    }
}

fn build_update_request(config: &Config, space_id: &str) -> UpdateSpaceRequest {
    UpdateSpaceRequest {
        id: space_id.to_string(),
        name: config.space_name.clone(),
        fixed_member: config.fixed_member,
        permissions: config.create_app_permission.map(|permission| Permissions {
            create_app: Some(permission),
        }),
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "はい"
    } else {
        "いいえ"
    }
}
