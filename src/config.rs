use std::collections::HashMap;
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use serde::Serialize;
use thiserror::Error;

#[derive(Parser, Debug)]
#[command(name = "kspace", version)]
#[command(about = "kintoneのスペースを作成、更新、表示、削除するツール")]
#[command(
    after_help = "操作の種類に応じて、スペースの作成、更新、表示、または削除を行います。\n\
                  操作の種類はactionオプションで指定してください（create, update, show, delete）。"
)]
pub struct Args {
    /// kintoneのドメイン
    #[arg(short = 'd', long, env = "KINTONE_DOMAIN")]
    pub domain: Option<String>,

    /// kintoneのユーザー名
    #[arg(short = 'u', long, env = "KINTONE_USERNAME")]
    pub username: Option<String>,

    /// kintoneのパスワード
    #[arg(short = 'p', long, env = "KINTONE_PASSWORD")]
    pub password: Option<String>,

    /// .envファイルのパス
    #[arg(short = 'e', long)]
    pub envfile: Option<PathBuf>,

    /// 既存のスペースID（指定時、ユーザーにはスペース管理権限が必要）
    #[arg(short = 'i', long = "spaceId")]
    pub space_id: Option<String>,

    /// スペースの名前
    #[arg(short = 's', long = "spaceName")]
    pub space_name: Option<String>,

    /// スペースメンバーの固定
    #[arg(
        short = 'f',
        long = "fixedMember",
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub fixed_member: Option<bool>,

    /// アプリ作成権限（EVERYONE または ADMIN）
    #[arg(short = 'c', long = "createAppPermission", value_enum)]
    pub create_app_permission: Option<CreateAppPermission>,

    /// ゲストスペースの指定
    #[arg(short = 'g', long)]
    pub guest: bool,

    /// スペーステンプレートIDの指定
    #[arg(short = 't', long = "templateId")]
    pub template_id: Option<String>,

    /// 操作の種類（create, update, show, delete）
    #[arg(short = 'a', long, value_enum)]
    pub action: Option<Action>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Action {
    Create,
    Update,
    Show,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[value(rename_all = "UPPER")]
pub enum CreateAppPermission {
    Everyone,
    Admin,
}

impl CreateAppPermission {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Everyone => "EVERYONE",
            Self::Admin => "ADMIN",
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("指定された.envファイルが見つかりません: {0}")]
    EnvFileNotFound(String),

    #[error(".envファイルの読み込みに失敗しました: {0}")]
    EnvFile(#[from] dotenvy::Error),

    #[error("ドメインを指定するか、環境変数KINTONE_DOMAINを設定してください。")]
    MissingDomain,

    #[error("ユーザー名を指定するか、環境変数KINTONE_USERNAMEを設定してください。")]
    MissingUsername,

    #[error("パスワードを指定するか、環境変数KINTONE_PASSWORDを設定してください。")]
    MissingPassword,

    #[error("操作の種類を指定するためにactionオプションを使用してください（create, update, show, delete）。")]
    MissingAction,

    #[error("スペースを作成するにはspaceNameまたはtemplateIdを指定してください。")]
    CreateNeedsNameOrTemplate,

    #[error("ゲストスペースを作成するにはtemplateIdを指定してください。")]
    GuestCreateNeedsTemplate,

    #[error("スペースを更新、表示、または削除するにはspaceIdを指定してください。")]
    MissingSpaceId,
}

/// Fully-resolved invocation parameters. Produced before any request is made.
#[derive(Debug, Clone)]
pub struct Config {
    pub domain: String,
    pub username: String,
    pub password: String,
    pub action: Action,
    pub space_id: Option<String>,
    pub space_name: Option<String>,
    pub fixed_member: Option<bool>,
    pub create_app_permission: Option<CreateAppPermission>,
    pub guest: bool,
    pub template_id: Option<String>,
}

impl Config {
    /// Merges flags, process environment and env files into a validated
    /// configuration. clap already folds process environment variables into
    /// the flag values, so the precedence ends up as flag > process env >
    /// cwd `.env` > `--envfile`. Files are read into a local map rather
    /// than exported into the process environment.
    pub fn resolve(args: Args) -> Result<Config, ConfigError> {
        let mut file_vars = match &args.envfile {
            Some(path) => load_env_file(path)?,
            None => HashMap::new(),
        };
        // A `.env` in the working directory is always consulted and, for
        // keys present in both files, wins over the explicit envfile.
        if let Ok(iter) = dotenvy::dotenv_iter() {
            for (key, value) in iter.flatten() {
                file_vars.insert(key, value);
            }
        }

        let domain =
            pick(args.domain, &file_vars, "KINTONE_DOMAIN").ok_or(ConfigError::MissingDomain)?;
        let username = pick(args.username, &file_vars, "KINTONE_USERNAME")
            .ok_or(ConfigError::MissingUsername)?;
        let password = pick(args.password, &file_vars, "KINTONE_PASSWORD")
            .ok_or(ConfigError::MissingPassword)?;

        let action = args.action.ok_or(ConfigError::MissingAction)?;

        if action == Action::Create && args.space_name.is_none() && args.template_id.is_none() {
            return Err(ConfigError::CreateNeedsNameOrTemplate);
        }
        if action == Action::Create && args.guest && args.template_id.is_none() {
            return Err(ConfigError::GuestCreateNeedsTemplate);
        }
        if matches!(action, Action::Update | Action::Show | Action::Delete)
            && args.space_id.is_none()
        {
            return Err(ConfigError::MissingSpaceId);
        }

        Ok(Config {
            domain,
            username,
            password,
            action,
            space_id: args.space_id,
            space_name: args.space_name,
            fixed_member: args.fixed_member,
            create_app_permission: args.create_app_permission,
            guest: args.guest,
            template_id: args.template_id,
        })
    }
}

fn pick(flag: Option<String>, file_vars: &HashMap<String, String>, key: &str) -> Option<String> {
    flag.filter(|value| !value.is_empty())
        .or_else(|| file_vars.get(key).cloned().filter(|value| !value.is_empty()))
}

fn load_env_file(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::EnvFileNotFound(path.display().to_string()));
    }
    let mut vars = HashMap::new();
    for item in dotenvy::from_path_iter(path)? {
        let (key, value) = item?;
        vars.insert(key, value);
    }
    Ok(vars)
}
