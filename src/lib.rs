//! zsearch - 工作区搜索结果聚合与替换引擎
//!
//! 模块结构：
//! - kernel: 结果树、会话、聚合、替换、装饰同步
//! - kernel::services::ports: 外部协作者契约（搜索、内容、编辑器、图标、配置）
//! - kernel::services::adapters: 本地实现（ignore + regex 搜索、文件系统、内存编辑器）
//! - logging: tracing 初始化

pub mod kernel;
pub mod logging;
