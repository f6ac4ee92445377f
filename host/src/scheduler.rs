//! # Scheduler 模块
//!
//! 单线程虚拟时钟事件循环，扮演宿主 UI 运行时的角色：
//!
//! - `request_frame`：下一帧回调（每次 `advance` 触发一次）
//! - `set_timeout`：在指定时间点触发的回调
//!
//! 调度器不持有回调闭包，只返回到期的 [`Wakeup`]，由上层分发给对应组件。
//! 所有任务都可以通过 [`TaskHandle`] 取消。

use std::fmt;
use std::time::Duration;

/// 组件 ID（任务的所有者）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WidgetId(pub u64);

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 任务句柄
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskHandle(u64);

/// 任务类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    /// 帧回调
    Frame,
    /// 定时回调
    Timeout,
}

/// 到期的任务
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wakeup {
    pub handle: TaskHandle,
    pub owner: WidgetId,
    pub kind: TaskKind,
}

#[derive(Debug, Clone)]
struct Timeout {
    at: Duration,
    handle: TaskHandle,
    owner: WidgetId,
}

/// 帧调度器
#[derive(Debug, Default)]
pub struct FrameScheduler {
    /// 当前时间
    now: Duration,
    /// 下一个句柄编号
    next_handle: u64,
    /// 等待下一帧的任务
    frames: Vec<(TaskHandle, WidgetId)>,
    /// 定时任务
    timeouts: Vec<Timeout>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前时间
    pub fn now(&self) -> Duration {
        self.now
    }

    /// 请求下一帧回调
    pub fn request_frame(&mut self, owner: WidgetId) -> TaskHandle {
        let handle = self.alloc_handle();
        self.frames.push((handle, owner));
        handle
    }

    /// 在 `at` 时刻触发回调（`at` 已过则在下一次 `advance` 触发）
    pub fn set_timeout(&mut self, owner: WidgetId, at: Duration) -> TaskHandle {
        let handle = self.alloc_handle();
        self.timeouts.push(Timeout { at, handle, owner });
        handle
    }

    /// 取消任务，返回任务是否仍在等待
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        let before = self.pending();
        self.frames.retain(|(h, _)| *h != handle);
        self.timeouts.retain(|t| t.handle != handle);
        self.pending() != before
    }

    /// 取消某个组件的全部任务
    pub fn cancel_owner(&mut self, owner: WidgetId) -> usize {
        let before = self.pending();
        self.frames.retain(|(_, o)| *o != owner);
        self.timeouts.retain(|t| t.owner != owner);
        before - self.pending()
    }

    /// 等待中的任务数量
    pub fn pending(&self) -> usize {
        self.frames.len() + self.timeouts.len()
    }

    /// 推进时钟一帧
    ///
    /// 先按到期时间顺序返回定时任务，再返回本帧之前请求的所有帧回调。
    pub fn advance(&mut self, dt: Duration) -> Vec<Wakeup> {
        self.now += dt;
        let now = self.now;

        let (mut due, waiting): (Vec<_>, Vec<_>) =
            self.timeouts.drain(..).partition(|t| t.at <= now);
        self.timeouts = waiting;
        due.sort_by_key(|t| (t.at, t.handle));

        let mut wakeups: Vec<Wakeup> = due
            .into_iter()
            .map(|t| Wakeup {
                handle: t.handle,
                owner: t.owner,
                kind: TaskKind::Timeout,
            })
            .collect();

        wakeups.extend(self.frames.drain(..).map(|(handle, owner)| Wakeup {
            handle,
            owner,
            kind: TaskKind::Frame,
        }));

        wakeups
    }

    fn alloc_handle(&mut self) -> TaskHandle {
        self.next_handle += 1;
        TaskHandle(self.next_handle)
    }
}
