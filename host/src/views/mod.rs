//! # Views 模块
//!
//! 组件视图：把 runtime 中的纯逻辑组件接到宿主调度器上，
//! 负责帧/定时任务的注册、存活检查与卸载时的取消。

mod carousel;
mod counter;

pub use carousel::CarouselView;
pub use counter::CounterView;
