//! 实体记录与统计结果类型
//!
//! 所有类型都是不可变的值记录：解析器每处理一个文件生成一批
//! `DrawingEntity`，聚合引擎在此之上构建两级统计，处理下一个
//! 文件时整体替换，不存在跨请求的共享状态。

use serde::{Deserialize, Serialize};

/// 无图层实体的哨兵图层名
pub const UNDEFINED_LAYER: &str = "undefined";

/// 一个已解析的图形实体
///
/// `kind` 是实体的语义名称（如块引用的块名），原始几何体
/// （线、圆等）没有语义名称时为 `None`。核心不修改实体。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawingEntity {
    /// 实体名称，可能缺失
    pub kind: Option<String>,
    /// 所属图层，可能缺失
    pub layer: Option<String>,
}

impl DrawingEntity {
    /// 创建命名实体
    pub fn new(kind: impl Into<String>, layer: impl Into<String>) -> Self {
        Self {
            kind: Some(kind.into()),
            layer: Some(layer.into()),
        }
    }

    /// 创建无名称实体（不会进入统计结果）
    pub fn unnamed(layer: impl Into<String>) -> Self {
        Self {
            kind: None,
            layer: Some(layer.into()),
        }
    }

    /// 实体名称是否可用（存在且非空）
    pub fn has_kind(&self) -> bool {
        self.kind.as_deref().is_some_and(|k| !k.is_empty())
    }

    /// 返回有效图层名，缺失或为空时使用哨兵值
    pub fn layer_or_undefined(&self) -> &str {
        match self.layer.as_deref() {
            Some(layer) if !layer.is_empty() => layer,
            _ => UNDEFINED_LAYER,
        }
    }
}

/// 某一名称的实体在单个图层上的数量
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerCount {
    pub layer: String,
    pub count: u64,
}

/// 按名称聚合的实体组
///
/// 不变量：`count` 等于 `layers` 中所有计数之和；
/// `layers` 内图层名唯一，顺序为首次出现顺序。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityGroup {
    /// 实体名称
    pub name: String,
    /// 全部图层上的总数
    pub count: u64,
    /// 各图层上的数量
    pub layers: Vec<LayerCount>,
}

impl EntityGroup {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            count: 0,
            layers: Vec::new(),
        }
    }

    /// 记录一个位于 `layer` 的实体
    pub(crate) fn record(&mut self, layer: &str) {
        match self.layers.iter_mut().find(|l| l.layer == layer) {
            Some(entry) => entry.count += 1,
            None => self.layers.push(LayerCount {
                layer: layer.to_string(),
                count: 1,
            }),
        }
        self.count += 1;
    }

    /// 查找指定图层的计数
    pub fn layer_count(&self, layer: &str) -> Option<u64> {
        self.layers.iter().find(|l| l.layer == layer).map(|l| l.count)
    }
}
