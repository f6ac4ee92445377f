//! # Timer 模块
//!
//! 固定节拍的循环定时器，由调用方传入当前时间驱动。
//!
//! 触发时间按整数个周期推进（`next_due += interval`），
//! 因此即使轮询不及时，节拍也不会漂移。

use std::time::Duration;

/// 循环定时器
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalTimer {
    /// 周期
    interval: Duration,
    /// 下一次触发时间（None 表示未启动）
    next_due: Option<Duration>,
}

impl IntervalTimer {
    /// 创建未启动的定时器
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
        }
    }

    /// 从 `now` 开始计时，第一次触发在 `now + interval`
    pub fn arm(&mut self, now: Duration) {
        if self.interval.is_zero() {
            self.next_due = None;
            return;
        }
        self.next_due = Some(now + self.interval);
    }

    /// 取消定时器
    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    pub fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn next_due(&self) -> Option<Duration> {
        self.next_due
    }

    /// 轮询定时器
    ///
    /// 返回截至 `now` 新到期的周期数。
    pub fn poll(&mut self, now: Duration) -> u32 {
        let Some(mut due) = self.next_due else {
            return 0;
        };

        let mut fired = 0;
        while due <= now {
            fired += 1;
            due += self.interval;
        }
        self.next_due = Some(due);
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_unarmed_never_fires() {
        let mut timer = IntervalTimer::new(ms(100));
        assert_eq!(timer.poll(ms(10_000)), 0);
        assert!(!timer.is_armed());
    }

    #[test]
    fn test_fires_on_cadence() {
        let mut timer = IntervalTimer::new(ms(100));
        timer.arm(ms(0));
        assert_eq!(timer.poll(ms(99)), 0);
        assert_eq!(timer.poll(ms(100)), 1);
        assert_eq!(timer.poll(ms(150)), 0);
        assert_eq!(timer.next_due(), Some(ms(200)));
    }

    #[test]
    fn test_late_poll_catches_up_without_drift() {
        let mut timer = IntervalTimer::new(ms(100));
        timer.arm(ms(0));
        assert_eq!(timer.poll(ms(350)), 3);
        assert_eq!(timer.next_due(), Some(ms(400)));
    }

    #[test]
    fn test_cancel() {
        let mut timer = IntervalTimer::new(ms(100));
        timer.arm(ms(0));
        timer.cancel();
        assert_eq!(timer.poll(ms(1000)), 0);
        assert_eq!(timer.next_due(), None);
    }

    #[test]
    fn test_zero_interval_never_arms() {
        let mut timer = IntervalTimer::new(Duration::ZERO);
        timer.arm(ms(0));
        assert!(!timer.is_armed());
    }
}
