//! 特征注册表
//!
//! 启动期构建一次，之后只读，可在任意多个线程间无锁共享。
//! 字节模式特征按传输层分区，再按偏移分桶，桶内以模式首字节索引；
//! 端口特征按端口号索引。同一索引槽内保持注册顺序。

use crate::core::session::Transport;
use crate::core::signature::{Selector, SignatureEntry};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// 同一偏移下的首字节索引
#[derive(Debug, Default)]
struct OffsetBucket {
    offset: usize,
    by_first_byte: HashMap<u8, Vec<usize>>,
}

/// 单个传输层的模式索引
#[derive(Debug, Default)]
struct PatternIndex {
    buckets: Vec<OffsetBucket>,
}

impl PatternIndex {
    fn build(entries: &[SignatureEntry], transport: Transport) -> Self {
        let mut by_offset: BTreeMap<usize, HashMap<u8, Vec<usize>>> = BTreeMap::new();

        for (index, entry) in entries.iter().enumerate() {
            if entry.selector() != Selector::Transport(transport) {
                continue;
            }
            if let Some(&first) = entry.pattern_bytes().first() {
                by_offset
                    .entry(entry.offset())
                    .or_default()
                    .entry(first)
                    .or_default()
                    .push(index);
            }
        }

        Self {
            buckets: by_offset
                .into_iter()
                .map(|(offset, by_first_byte)| OffsetBucket {
                    offset,
                    by_first_byte,
                })
                .collect(),
        }
    }
}

/// 特征注册表
#[derive(Debug, Default)]
pub struct SignatureRegistry {
    entries: Vec<SignatureEntry>,
    tcp: PatternIndex,
    udp: PatternIndex,
    ports: HashMap<u16, Vec<usize>>,
}

impl SignatureRegistry {
    /// 从已校验的特征列表构建注册表
    pub(crate) fn from_entries(entries: Vec<SignatureEntry>) -> Self {
        let tcp = PatternIndex::build(&entries, Transport::Tcp);
        let udp = PatternIndex::build(&entries, Transport::Udp);

        let mut ports: HashMap<u16, Vec<usize>> = HashMap::new();
        for (index, entry) in entries.iter().enumerate() {
            if let Selector::Port(selector) = entry.selector() {
                ports.entry(selector.port).or_default().push(index);
            }
        }

        Self {
            entries,
            tcp,
            udp,
            ports,
        }
    }

    /// 特征数量
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 所有特征（注册顺序）
    pub fn entries(&self) -> &[SignatureEntry] {
        &self.entries
    }

    /// 所有不同的特征名称
    pub fn names(&self) -> BTreeSet<&str> {
        self.entries.iter().map(SignatureEntry::name).collect()
    }

    /// 指定名称的所有特征
    pub fn entries_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a SignatureEntry> + 'a {
        self.entries.iter().filter(move |entry| entry.name() == name)
    }

    fn index(&self, transport: Transport) -> &PatternIndex {
        match transport {
            Transport::Tcp => &self.tcp,
            Transport::Udp => &self.udp,
        }
    }

    /// 首字节命中的字节模式候选
    ///
    /// 只做索引查找，完整模式比较由调用方通过[`SignatureEntry::matches`]完成。
    pub fn pattern_candidates<'r, 'd>(
        &'r self,
        transport: Transport,
        data: &'d [u8],
    ) -> PatternCandidates<'r, 'd> {
        let empty: &'r [usize] = &[];
        PatternCandidates {
            registry: self,
            buckets: self.index(transport).buckets.iter(),
            current: empty.iter(),
            data,
        }
    }

    /// 端口选择器满足的端口特征
    ///
    /// port1与port2相同时只查找一次，每条特征每次调用至多返回一次。
    pub fn port_candidates(
        &self,
        transport: Transport,
        port1: u16,
        port2: u16,
    ) -> impl Iterator<Item = &SignatureEntry> + '_ {
        let second = if port2 != port1 { Some(port2) } else { None };

        std::iter::once(port1)
            .chain(second)
            .filter_map(move |port| self.ports.get(&port))
            .flatten()
            .map(move |&index| &self.entries[index])
            .filter(move |entry| match entry.selector() {
                Selector::Port(selector) => selector.matches(transport, port1, port2),
                Selector::Transport(_) => false,
            })
    }
}

/// 字节模式候选迭代器
#[derive(Debug, Clone)]
pub struct PatternCandidates<'r, 'd> {
    registry: &'r SignatureRegistry,
    buckets: std::slice::Iter<'r, OffsetBucket>,
    current: std::slice::Iter<'r, usize>,
    data: &'d [u8],
}

impl<'r> Iterator for PatternCandidates<'r, '_> {
    type Item = &'r SignatureEntry;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(&index) = self.current.next() {
                return Some(&self.registry.entries[index]);
            }
            let bucket = self.buckets.next()?;
            if let Some(indices) = self
                .data
                .get(bucket.offset)
                .and_then(|byte| bucket.by_first_byte.get(byte))
            {
                self.current = indices.iter();
            }
        }
    }
}
