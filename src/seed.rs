// ABOUTME: Baseline data for a fresh admin database: roles, the navigation menu tree and voice types
// ABOUTME: Every seeder is idempotent and reports how many rows it added
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fluent Life

//! # Seed Data
//!
//! Used by the `seed-admin-data` binary. Seeding never overwrites rows an
//! operator has edited: roles are matched by code, menus by name under the
//! same parent, and voice types by code. Only `--reset-voice-types` replaces
//! an existing catalogue.

use tracing::{debug, info};

use crate::database::Database;
use crate::errors::AppResult;
use crate::models::{NewMenu, NewRole, NewVoiceType};

/// One entry of the default navigation tree
#[derive(Debug, Clone, Copy)]
pub struct MenuSeed {
    /// Display name
    pub name: &'static str,
    /// Front-end route; empty for group headers
    pub path: &'static str,
    /// Icon name understood by the admin front-end
    pub icon: &'static str,
    /// Sort key within the parent
    pub sort: i32,
    /// Direct children
    pub children: &'static [MenuSeed],
}

impl MenuSeed {
    const fn leaf(name: &'static str, path: &'static str, icon: &'static str, sort: i32) -> Self {
        Self {
            name,
            path,
            icon,
            sort,
            children: &[],
        }
    }

    const fn group(
        name: &'static str,
        icon: &'static str,
        sort: i32,
        children: &'static [Self],
    ) -> Self {
        Self {
            name,
            path: "",
            icon,
            sort,
            children,
        }
    }

    fn to_new_menu(self, parent_id: Option<uuid::Uuid>) -> NewMenu {
        NewMenu {
            name: self.name.to_owned(),
            path: self.path.to_owned(),
            icon: self.icon.to_owned(),
            parent_id,
            sort: self.sort,
        }
    }
}

const COMMUNITY_MENUS: &[MenuSeed] = &[
    MenuSeed::leaf("帖子管理", "/posts", "FileText", 1),
    MenuSeed::leaf("评论管理", "/comments", "MessageCircle", 2),
    MenuSeed::leaf("点赞管理", "/post-likes", "ThumbsUp", 3),
    MenuSeed::leaf("关注/收藏", "/follows-collections", "UserPlus", 4),
];

const TRAINING_MENUS: &[MenuSeed] = &[
    MenuSeed::leaf("训练统计", "/training", "BarChart3", 1),
    MenuSeed::leaf("房间管理", "/rooms", "Home", 2),
];

const EXPOSURE_MENUS: &[MenuSeed] = &[MenuSeed::leaf(
    "脱敏练习场景管理",
    "/exposure-modules",
    "FileText",
    1,
)];

const CONTENT_MENUS: &[MenuSeed] = &[
    MenuSeed::leaf("绕口令管理", "/tongue-twisters", "MessageSquare", 1),
    MenuSeed::leaf("每日朗诵文案", "/daily-expressions", "BookOpen", 2),
    MenuSeed::leaf("语音技巧训练", "/speech-techniques", "MessageSquare", 3),
    MenuSeed::leaf("法律文档", "/legal-documents", "FileText", 4),
    MenuSeed::leaf("应用设置", "/app-settings", "Settings", 5),
    MenuSeed::leaf("帮助分类", "/help-categories", "FileSearch", 6),
    MenuSeed::leaf("帮助文章", "/help-articles", "MessageSquare", 7),
];

const AI_MENUS: &[MenuSeed] = &[
    MenuSeed::leaf("AI模拟角色管理", "/ai-roles", "Users", 1),
    MenuSeed::leaf("音色管理", "/voice-types", "Settings", 2),
];

const SYSTEM_MENUS: &[MenuSeed] = &[
    MenuSeed::leaf("操作日志", "/operation-logs", "FileSearch", 1),
    MenuSeed::leaf("权限管理", "/permission", "Shield", 2),
    MenuSeed::leaf("系统设置", "/settings", "Settings", 3),
];

/// Default navigation tree, roots in display order
pub const DEFAULT_MENUS: &[MenuSeed] = &[
    MenuSeed::leaf("数据概览", "/", "LayoutDashboard", 1),
    MenuSeed::leaf("用户管理", "/users", "Users", 2),
    MenuSeed::leaf("视频管理", "/videos", "FileText", 3),
    MenuSeed::group("社区管理", "CommunityGroup", 4, COMMUNITY_MENUS),
    MenuSeed::group("训练管理", "TrainingGroup", 5, TRAINING_MENUS),
    MenuSeed::group("脱敏练习", "Users", 6, EXPOSURE_MENUS),
    MenuSeed::group("内容管理", "ContentGroup", 7, CONTENT_MENUS),
    MenuSeed::group("AI管理", "MessageSquare", 8, AI_MENUS),
    MenuSeed::group("系统管理", "SystemGroup", 9, SYSTEM_MENUS),
];

fn permissions(names: &[&str]) -> Vec<String> {
    names.iter().map(|p| (*p).to_owned()).collect()
}

/// Built-in roles
#[must_use]
pub fn default_roles() -> Vec<NewRole> {
    vec![
        NewRole {
            name: "超级管理员".to_owned(),
            code: "super_admin".to_owned(),
            description: "拥有系统所有权限，可管理所有功能模块".to_owned(),
            permissions: permissions(&["*"]),
        },
        NewRole {
            name: "管理员".to_owned(),
            code: "admin".to_owned(),
            description: "拥有大部分管理权限，可管理用户、内容等".to_owned(),
            permissions: permissions(&[
                "user:read",
                "user:write",
                "post:read",
                "post:write",
                "comment:read",
                "comment:write",
                "content:read",
                "content:write",
            ]),
        },
        NewRole {
            name: "内容管理员".to_owned(),
            code: "content_admin".to_owned(),
            description: "负责内容管理，可管理帖子、评论、训练记录等".to_owned(),
            permissions: permissions(&[
                "post:read",
                "post:write",
                "comment:read",
                "comment:write",
                "training:read",
                "training:write",
                "content:read",
                "content:write",
            ]),
        },
        NewRole {
            name: "普通用户".to_owned(),
            code: "user".to_owned(),
            description: "普通用户角色，只能查看自己的数据".to_owned(),
            permissions: permissions(&["self:read"]),
        },
    ]
}

/// Built-in voice catalogue
#[must_use]
pub fn default_voice_types() -> Vec<NewVoiceType> {
    vec![
        NewVoiceType::enabled(
            "Vivi 2.0 通用",
            "zh_female_vv_uranus_bigtts",
            "通用女声，中文/英语混合，适合多语言场景",
        ),
        NewVoiceType::enabled(
            "小何 2.0 通用",
            "zh_female_xiaohe_uranus_bigtts",
            "通用女声，中文，适合日常对话和内容朗读",
        ),
        NewVoiceType::enabled(
            "云舟 2.0 通用",
            "zh_male_m191_uranus_bigtts",
            "通用男声，中文，适合知识讲解和正式场合",
        ),
        NewVoiceType::enabled(
            "儿童绘本",
            "zh_female_xueayi_saturn_bigtts",
            "精品克隆音色，适合儿童内容、绘本朗读",
        ),
        NewVoiceType::enabled(
            "大壹",
            "zh_male_dayi_saturn_bigtts",
            "精品克隆音色，适合角色扮演和内容创作",
        ),
        NewVoiceType::enabled(
            "黑猫侦探社咪",
            "zh_female_mizai_saturn_bigtts",
            "精品克隆音色，适合故事讲述和角色配音",
        ),
        NewVoiceType::enabled(
            "鸡汤女",
            "zh_female_jitangnv_saturn_bigtts",
            "精品克隆音色，适合情感表达和心灵鸡汤类内容",
        ),
        NewVoiceType::enabled(
            "魅力女友",
            "zh_female_meilinvyou_saturn_bigtts",
            "精品克隆音色，适合视频配音和互动场景",
        ),
    ]
}

/// Insert the built-in roles whose code is free; returns how many were added
pub async fn seed_roles(database: &Database) -> AppResult<usize> {
    let mut added = 0;
    for role in default_roles() {
        if database.role_code_taken(&role.code, None).await? {
            debug!(code = %role.code, "Role already present");
            continue;
        }
        database.create_role(&role).await?;
        added += 1;
    }
    info!(added, "Seeded roles");
    Ok(added)
}

/// Insert missing entries of the default menu tree; returns how many were added
///
/// Existing groups are reused as parents, so a partially seeded tree is
/// completed rather than duplicated.
pub async fn seed_menus(database: &Database) -> AppResult<usize> {
    let mut added = 0;
    for root in DEFAULT_MENUS {
        let parent = match database.find_menu(root.name, None).await? {
            Some(existing) => existing,
            None => {
                added += 1;
                database.create_menu(&root.to_new_menu(None)).await?
            }
        };

        for child in root.children {
            if database.find_menu(child.name, Some(parent.id)).await?.is_some() {
                continue;
            }
            database
                .create_menu(&child.to_new_menu(Some(parent.id)))
                .await?;
            added += 1;
        }
    }
    info!(added, "Seeded menus");
    Ok(added)
}

/// Seed the voice catalogue
///
/// With `reset` the whole table is replaced by the defaults and the number of
/// defaults is returned; otherwise only missing codes are inserted.
pub async fn seed_voice_types(database: &Database, reset: bool) -> AppResult<usize> {
    let voices = default_voice_types();
    let added = if reset {
        database.replace_voice_types(&voices).await?;
        voices.len()
    } else {
        database.ensure_voice_types(&voices).await?
    };
    info!(added, reset, "Seeded voice types");
    Ok(added)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_default_roles_have_unique_codes() {
        let roles = default_roles();
        let codes: HashSet<_> = roles.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes.len(), roles.len());
        assert!(codes.contains("super_admin"));
        assert!(codes.contains("admin"));
        assert_eq!(roles[0].permissions, vec!["*".to_owned()]);
    }

    #[test]
    fn test_default_menu_tree_shape() {
        assert_eq!(DEFAULT_MENUS.len(), 9);
        let total: usize = DEFAULT_MENUS.iter().map(|m| 1 + m.children.len()).sum();
        assert_eq!(total, 28);

        for root in DEFAULT_MENUS {
            if !root.children.is_empty() {
                assert!(root.path.is_empty(), "group {} should have no path", root.name);
            }
        }
    }

    #[test]
    fn test_default_voice_types_unique_and_enabled() {
        let voices = default_voice_types();
        assert_eq!(voices.len(), 8);
        let codes: HashSet<_> = voices.iter().map(|v| v.voice_type.as_str()).collect();
        assert_eq!(codes.len(), voices.len());
        assert!(voices.iter().all(|v| v.enabled == Some(true)));
    }

    #[tokio::test]
    async fn test_seeders_are_idempotent() {
        let database = Database::new("sqlite::memory:").await.unwrap();

        assert_eq!(seed_roles(&database).await.unwrap(), 4);
        assert_eq!(seed_roles(&database).await.unwrap(), 0);

        assert_eq!(seed_menus(&database).await.unwrap(), 28);
        assert_eq!(seed_menus(&database).await.unwrap(), 0);

        assert_eq!(seed_voice_types(&database, false).await.unwrap(), 8);
        assert_eq!(seed_voice_types(&database, false).await.unwrap(), 0);
        assert_eq!(seed_voice_types(&database, true).await.unwrap(), 8);
        assert_eq!(database.list_voice_types().await.unwrap().len(), 8);
    }
}
