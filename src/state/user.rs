//! User profile display data.

#[cfg(test)]
#[path = "user_test.rs"]
mod user_test;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::storage::{Storage, load_json, save_json};

/// Storage key for [`UserState`].
pub const USER_STORAGE_KEY: &str = "userStorage";

pub const DEFAULT_AVATAR: &str =
    "https://static.fotor.com.cn/assets/stickers/18531/77a12b1f-90d4-41ff-92d3-e134a081e18c_medium_thumb.jpg";
pub const DEFAULT_NAME: &str = "userName";
pub const DEFAULT_DESCRIPTION: &str = r#"问题反馈 <a href="https://github.com/Chanzhaoyu/chatgpt-bot" class="text-blue-500" target="_blank" >微信联系</a>"#;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserInfo {
    pub avatar: String,
    pub name: String,
    pub description: String,
}

impl Default for UserInfo {
    fn default() -> Self {
        Self {
            avatar: DEFAULT_AVATAR.to_owned(),
            name: DEFAULT_NAME.to_owned(),
            description: DEFAULT_DESCRIPTION.to_owned(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserState {
    pub user_info: UserInfo,
}

/// Partial profile update; `None` fields keep their current value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserInfoPatch {
    pub avatar: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
}

pub struct UserStore {
    storage: Arc<dyn Storage>,
    state: UserState,
}

impl UserStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        let state = load_json::<UserState>(storage.as_ref(), USER_STORAGE_KEY).unwrap_or_default();
        Self { storage, state }
    }

    #[must_use]
    pub fn user_info(&self) -> &UserInfo {
        &self.state.user_info
    }

    pub fn update_user_info(&mut self, patch: UserInfoPatch) {
        let info = &mut self.state.user_info;
        if let Some(avatar) = patch.avatar {
            info.avatar = avatar;
        }
        if let Some(name) = patch.name {
            info.name = name;
        }
        if let Some(description) = patch.description {
            info.description = description;
        }
        self.record_state();
    }

    pub fn reset_user_info(&mut self) {
        self.state.user_info = UserInfo::default();
        self.record_state();
    }

    fn record_state(&self) {
        save_json(self.storage.as_ref(), USER_STORAGE_KEY, &self.state);
    }
}
