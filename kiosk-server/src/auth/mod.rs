//! 认证模块 - 管理端 JWT 认证
//!
//! 终端验证接口 (`/api/verify`, `/api/self`) 面向车间一体机，公开；
//! 管理端 API 由单一 admin 账户的 JWT 保护。

pub mod jwt;
pub mod middleware;
pub mod password;

pub use jwt::{Claims, JwtConfig, JwtError, JwtService};
pub use middleware::{require_admin, require_auth};

/// Authenticated admin context injected into request extensions
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub username: String,
    pub role: String,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        Self {
            username: claims.username,
            role: claims.role,
        }
    }
}
