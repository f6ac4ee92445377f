//! # Error 模块
//!
//! 定义 showcase-runtime 中使用的错误类型。

use thiserror::Error;

/// 轮播错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CarouselError {
    /// 幻灯片数量为 0
    #[error("轮播至少需要 1 张幻灯片")]
    Empty,

    /// 启用自动播放时间隔为 0
    #[error("自动播放间隔不能为 0")]
    ZeroInterval,

    /// 跳转索引越界
    #[error("无效的幻灯片索引 {index}，有效范围是 0..{len}")]
    OutOfRange { index: usize, len: usize },

    /// 控制器已销毁
    #[error("轮播控制器已销毁")]
    Disposed,
}

/// showcase-runtime 统一错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    /// 轮播错误
    #[error("轮播错误: {0}")]
    Carousel(#[from] CarouselError),
}

/// Result 类型别名
pub type RuntimeResult<T> = Result<T, RuntimeError>;
