//! 特征匹配分发器
//!
//! 对一个会话方向的缓冲区，找出所有选择器适用且模式匹配的特征，
//! 并对每条匹配的特征调用一次分类器。分发器本身无状态，可重复调用，
//! 也可在多个线程上针对不同会话并发调用。

use crate::core::registry::SignatureRegistry;
use crate::core::session::{Direction, Session};
use crate::core::signature::SignatureEntry;
use std::collections::HashMap;

/// 单次分类结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifyOutcome<'r> {
    /// 索引命中的候选特征数
    pub candidates: usize,
    /// 实际调用的分类器数
    pub fired: usize,
    /// 分类器确认的特征名称（按调用顺序）
    pub confirmed: Vec<&'r str>,
}

impl ClassifyOutcome<'_> {
    /// 是否有分类器确认
    pub fn is_classified(&self) -> bool {
        !self.confirmed.is_empty()
    }
}

/// 特征匹配分发器
#[derive(Debug, Clone, Copy)]
pub struct Dispatcher<'r> {
    registry: &'r SignatureRegistry,
}

impl<'r> Dispatcher<'r> {
    /// 基于注册表创建分发器
    pub fn new(registry: &'r SignatureRegistry) -> Self {
        Self { registry }
    }

    /// 所使用的注册表
    pub fn registry(&self) -> &'r SignatureRegistry {
        self.registry
    }

    /// 对一个方向的缓冲区执行分类
    ///
    /// 所有匹配的特征都会触发，不存在先匹配先得。缓冲区过短的特征直接跳过。
    pub fn classify(
        &self,
        session: &mut dyn Session,
        data: &[u8],
        direction: Direction,
    ) -> ClassifyOutcome<'r> {
        let transport = session.transport();
        let (port1, port2) = (session.port1(), session.port2());
        let mut outcome = ClassifyOutcome::default();

        for entry in self.registry.pattern_candidates(transport, data) {
            outcome.candidates += 1;
            if entry.matches(data) {
                Self::fire(entry, session, data, direction, &mut outcome);
            }
        }

        for entry in self.registry.port_candidates(transport, port1, port2) {
            outcome.candidates += 1;
            Self::fire(entry, session, data, direction, &mut outcome);
        }

        outcome
    }

    fn fire(
        entry: &'r SignatureEntry,
        session: &mut dyn Session,
        data: &[u8],
        direction: Direction,
        outcome: &mut ClassifyOutcome<'r>,
    ) {
        outcome.fired += 1;
        if entry.classifier().try_classify(session, data, direction) {
            crate::psi_detect!(
                "{} 确认 ({}字节, {:?}, 端口 {}/{})",
                entry.name(),
                data.len(),
                direction,
                session.port1(),
                session.port2()
            );
            outcome.confirmed.push(entry.name());
        }
    }
}

/// 分类统计
///
/// 由调用方持有并累积，分发器本身不保存任何状态。
#[derive(Debug, Clone, Default)]
pub struct ClassifyStats {
    /// 总调用次数
    pub total_calls: u64,
    /// 至少一个分类器确认的调用次数
    pub classified_calls: u64,
    /// 触发的分类器总数
    pub fired_callbacks: u64,
    /// 各特征确认次数
    pub confirmations: HashMap<String, u64>,
}

impl ClassifyStats {
    /// 创建新的统计信息
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一次分类结果
    pub fn record(&mut self, outcome: &ClassifyOutcome<'_>) {
        self.total_calls += 1;
        self.fired_callbacks += outcome.fired as u64;
        if outcome.is_classified() {
            self.classified_calls += 1;
        }
        for name in &outcome.confirmed {
            match self.confirmations.get_mut(*name) {
                Some(count) => *count += 1,
                None => {
                    self.confirmations.insert((*name).to_string(), 1);
                }
            }
        }
    }

    /// 分类命中率
    pub fn hit_rate(&self) -> f64 {
        if self.total_calls == 0 {
            0.0
        } else {
            self.classified_calls as f64 / self.total_calls as f64
        }
    }

    /// 最常确认的特征名称
    pub fn most_common(&self) -> Option<&str> {
        self.confirmations
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(name, _)| name.as_str())
    }
}
