//! # Easing 模块
//!
//! 缓动函数库，用于计数器与幻灯片过渡的时间插值。

use serde::{Deserialize, Serialize};

/// 缓动函数类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EasingFunction {
    /// 线性（匀速）
    Linear,
    /// 二次缓出
    EaseOutQuad,
    /// 三次缓出
    EaseOutCubic,
    /// 四次缓出（计数器默认）
    #[default]
    EaseOutQuart,
    /// 三次缓入缓出（幻灯片过渡）
    EaseInOut,
}

impl EasingFunction {
    /// 计算缓动值
    ///
    /// # 参数
    /// - `t`: 时间进度 (0.0 - 1.0)
    ///
    /// # 返回
    /// - 缓动后的进度值 (0.0 - 1.0)
    pub fn apply(&self, t: f64) -> f64 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };

        match self {
            EasingFunction::Linear => t,
            EasingFunction::EaseOutQuad => 1.0 - (1.0 - t).powi(2),
            EasingFunction::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            EasingFunction::EaseOutQuart => ease_out_quart(t),
            EasingFunction::EaseInOut => ease_in_out(t),
        }
    }
}

/// 四次缓出：`1 - (1 - t)^4`
fn ease_out_quart(t: f64) -> f64 {
    1.0 - (1.0 - t).powi(4)
}

/// 缓入缓出（Cubic）
fn ease_in_out(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [EasingFunction; 5] = [
        EasingFunction::Linear,
        EasingFunction::EaseOutQuad,
        EasingFunction::EaseOutCubic,
        EasingFunction::EaseOutQuart,
        EasingFunction::EaseInOut,
    ];

    #[test]
    fn test_endpoints() {
        for easing in ALL {
            assert_eq!(easing.apply(0.0), 0.0, "{easing:?}");
            assert_eq!(easing.apply(1.0), 1.0, "{easing:?}");
        }
    }

    #[test]
    fn test_clamp() {
        let easing = EasingFunction::Linear;
        // 超出范围应该被限制
        assert_eq!(easing.apply(-0.5), 0.0);
        assert_eq!(easing.apply(1.5), 1.0);
        assert_eq!(easing.apply(f64::NAN), 0.0);
    }

    #[test]
    fn test_ease_out_quart_front_loaded() {
        let easing = EasingFunction::EaseOutQuart;
        // 1 - 0.5^4 = 0.9375
        assert!((easing.apply(0.5) - 0.9375).abs() < 1e-12);
        assert!(easing.apply(0.1) > 0.3);
    }

    #[test]
    fn test_monotonic() {
        for easing in ALL {
            let mut prev = 0.0;
            for i in 0..=1000 {
                let v = easing.apply(i as f64 / 1000.0);
                assert!(v >= prev, "{easing:?} 在 {i} 处递减");
                prev = v;
            }
        }
    }

    #[test]
    fn test_ease_in_out_midpoint() {
        let mid = EasingFunction::EaseInOut.apply(0.5);
        assert!((mid - 0.5).abs() < 0.01);
    }
}
