//! 工具函数模块
//!
//! - 对象内容的分块读取
//! - 程序边界上的取消与超时处理

pub mod body;
pub mod cancel;
