// ==========================================
// 考务花名册管理系统 - 账号领域模型
// ==========================================
// 口径:
// - 非管理员账号必须挂靠 (学校代码, 学校简称, 学届)
// - 管理员账号可以不挂靠任何学校
// - 口令以加盐 SHA-256 摘要形式存储，核心层不保留明文
// ==========================================

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

// ==========================================
// Account - 学校/管理员账号
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: Option<i64>,             // 行 id（未落库时为 None）
    pub username: String,            // 用户名（自然键，全局唯一）
    pub password_hash: String,       // 口令摘要
    pub is_admin: bool,              // 管理员标志
    pub school_code: Option<String>, // 学校代码
    pub school_name: Option<String>, // 学校简称
    pub cohort: Option<String>,      // 学届（如 "2027届"）
}

impl Account {
    /// 构造学校账号（非管理员，必须挂靠学校与学届）
    pub fn school_account(
        username: &str,
        password: &str,
        school_code: &str,
        school_name: &str,
        cohort: &str,
    ) -> Self {
        Self {
            id: None,
            password_hash: hash_password(username, password),
            username: username.to_string(),
            is_admin: false,
            school_code: Some(school_code.to_string()),
            school_name: Some(school_name.to_string()),
            cohort: Some(cohort.to_string()),
        }
    }

    /// 构造管理员账号
    pub fn admin_account(username: &str, password: &str) -> Self {
        Self {
            id: None,
            password_hash: hash_password(username, password),
            username: username.to_string(),
            is_admin: true,
            school_code: None,
            school_name: None,
            cohort: None,
        }
    }

    /// 校验口令（供外层认证调用）
    pub fn verify_password(&self, password: &str) -> bool {
        hash_password(&self.username, password) == self.password_hash
    }
}

/// 口令摘要（用户名作为盐，避免同口令同摘要）
pub fn hash_password(username: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(username.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    let digest = hasher.finalize();
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

// ==========================================
// ImportContext - 导入/导出操作上下文
// ==========================================
// 由外层认证会话构造，核心操作只读此显式值，
// 不读取任何全局会话状态
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportContext {
    pub username: String,    // 当前账号用户名
    pub is_admin: bool,      // 管理员标志（决定导出过滤范围）
    pub school_code: String, // 所属学校代码
    pub school_name: String, // 所属学校简称
    pub cohort: String,      // 所属学届
}

impl ImportContext {
    /// 由账号构造上下文；非管理员账号挂靠信息缺失视为数据错误
    pub fn from_account(account: &Account) -> Self {
        Self {
            username: account.username.clone(),
            is_admin: account.is_admin,
            school_code: account.school_code.clone().unwrap_or_default(),
            school_name: account.school_name.clone().unwrap_or_default(),
            cohort: account.cohort.clone().unwrap_or_default(),
        }
    }
}
