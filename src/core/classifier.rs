//! 精化分类器接口
//!
//! 特征前缀匹配只是廉价的预筛选。每个分类器必须独立完成结构校验，
//! 不依赖触发它的前缀，也不依赖其它分类器的执行顺序。

use crate::core::session::{Direction, Session};

/// 协议精化分类器
pub trait Classifier: Send + Sync {
    /// 分类器名称
    fn name(&self) -> &'static str;

    /// 执行精化校验
    ///
    /// 确认协议或提取到字段时返回true。不能确认时直接返回false，
    /// 不存在“可能”状态。任何输入都不得panic。
    fn try_classify(&self, session: &mut dyn Session, data: &[u8], direction: Direction) -> bool;
}

/// 匹配即打标签
///
/// 用于特征本身已足够区分的协议（长魔法串、固定前言等）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagProtocol {
    tag: String,
}

impl TagProtocol {
    /// 创建新的打标签分类器
    pub fn new<S: Into<String>>(tag: S) -> Self {
        Self { tag: tag.into() }
    }

    /// 标签
    pub fn tag(&self) -> &str {
        &self.tag
    }
}

impl Classifier for TagProtocol {
    fn name(&self) -> &'static str {
        "tag_protocol"
    }

    fn try_classify(&self, session: &mut dyn Session, _data: &[u8], _direction: Direction) -> bool {
        session.add_protocol(&self.tag);
        true
    }
}
