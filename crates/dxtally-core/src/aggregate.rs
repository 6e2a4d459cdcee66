//! 实体聚合
//!
//! 把实体序列按名称、图层两级分组计数。统计分两个阶段：
//! 先按图层分桶（保持图层首次出现的顺序），再扫描各桶按名称
//! 建组。组的顺序由桶扫描中名称首次出现的位置决定，因此与
//! 原始输入顺序可能不同，但对同一输入序列结果完全确定。

use std::collections::HashMap;

use serde::Serialize;

use crate::entity::{DrawingEntity, EntityGroup};

/// 聚合结果：按名称索引的实体组集合
///
/// 迭代顺序为名称首次出现的顺序。结果只读，重新统计时整体替换。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AggregationResult {
    groups: Vec<EntityGroup>,
}

impl AggregationResult {
    /// 全部实体组，按首次出现顺序
    pub fn groups(&self) -> &[EntityGroup] {
        &self.groups
    }

    /// 按名称查找实体组
    pub fn get(&self, name: &str) -> Option<&EntityGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// 所有组的实体总数
    pub fn total(&self) -> u64 {
        self.groups.iter().map(|g| g.count).sum()
    }
}

/// 聚合实体序列
///
/// - 名称缺失或为空的实体不计入任何组（无名几何体不参与统计）
/// - 图层缺失或为空的实体计入哨兵图层 `"undefined"`
///
/// 纯函数：无副作用，同一输入序列两次调用结果逐字节一致。
pub fn aggregate(entities: &[DrawingEntity]) -> AggregationResult {
    // 第一阶段：按图层分桶，保持图层首次出现顺序
    let mut layer_order: Vec<&str> = Vec::new();
    let mut buckets: HashMap<&str, Vec<&DrawingEntity>> = HashMap::new();
    for entity in entities {
        let layer = entity.layer_or_undefined();
        let bucket = buckets.entry(layer).or_insert_with(|| {
            layer_order.push(layer);
            Vec::new()
        });
        bucket.push(entity);
    }

    // 第二阶段：扫描各桶，按名称建组计数
    let mut groups: Vec<EntityGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for &layer in &layer_order {
        let Some(bucket) = buckets.get(layer) else {
            continue;
        };
        for entity in bucket {
            let Some(kind) = entity.kind.as_deref().filter(|k| !k.is_empty()) else {
                continue;
            };
            let slot = *index.entry(kind.to_string()).or_insert_with(|| {
                groups.push(EntityGroup::new(kind));
                groups.len() - 1
            });
            groups[slot].record(layer);
        }
    }

    AggregationResult { groups }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(kind: &str, layer: &str) -> DrawingEntity {
        DrawingEntity::new(kind, layer)
    }

    #[test]
    fn test_empty_input() {
        let result = aggregate(&[]);
        assert!(result.is_empty());
        assert_eq!(result.total(), 0);
    }

    #[test]
    fn test_basic_grouping() {
        let entities = vec![
            entity("LINE", "0"),
            entity("LINE", "0"),
            entity("CIRCLE", "A"),
            DrawingEntity::unnamed("A"),
        ];

        let result = aggregate(&entities);
        assert_eq!(result.len(), 2);

        let line = result.get("LINE").unwrap();
        assert_eq!(line.count, 2);
        assert_eq!(line.layers.len(), 1);
        assert_eq!(line.layer_count("0"), Some(2));

        let circle = result.get("CIRCLE").unwrap();
        assert_eq!(circle.count, 1);
        assert_eq!(circle.layer_count("A"), Some(1));
    }

    #[test]
    fn test_unnamed_entities_excluded() {
        let entities = vec![
            DrawingEntity::unnamed("0"),
            DrawingEntity {
                kind: Some(String::new()),
                layer: Some("0".to_string()),
            },
        ];
        assert!(aggregate(&entities).is_empty());
    }

    #[test]
    fn test_missing_layer_uses_sentinel() {
        let entities = vec![
            DrawingEntity {
                kind: Some("BOLT".to_string()),
                layer: None,
            },
            DrawingEntity {
                kind: Some("BOLT".to_string()),
                layer: Some(String::new()),
            },
        ];

        let result = aggregate(&entities);
        let group = result.get("BOLT").unwrap();
        assert_eq!(group.count, 2);
        assert_eq!(group.layer_count("undefined"), Some(2));
    }

    #[test]
    fn test_count_invariant() {
        let entities = vec![
            entity("A", "l1"),
            entity("A", "l2"),
            entity("A", "l1"),
            entity("B", "l2"),
            entity("A", "l3"),
        ];

        let result = aggregate(&entities);
        for group in result.groups() {
            let layer_sum: u64 = group.layers.iter().map(|l| l.count).sum();
            assert_eq!(group.count, layer_sum, "group {}", group.name);
        }
        assert_eq!(result.total(), 5);
    }

    #[test]
    fn test_group_order_follows_layer_buckets() {
        // l2 先出现，所以桶扫描顺序是 l2 再 l1：
        // l2 桶内 A、C，l1 桶内 B，组顺序应为 A、C、B
        let entities = vec![
            entity("A", "l2"),
            entity("B", "l1"),
            entity("C", "l2"),
        ];

        let result = aggregate(&entities);
        let names: Vec<&str> = result.groups().iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["A", "C", "B"]);
    }

    #[test]
    fn test_layer_order_within_group() {
        let entities = vec![
            entity("A", "l1"),
            entity("A", "l2"),
            entity("A", "l1"),
        ];

        let result = aggregate(&entities);
        let layers: Vec<&str> = result
            .get("A")
            .unwrap()
            .layers
            .iter()
            .map(|l| l.layer.as_str())
            .collect();
        assert_eq!(layers, vec!["l1", "l2"]);
    }

    #[test]
    fn test_deterministic_and_idempotent() {
        let entities = vec![
            entity("A", "l2"),
            entity("B", "l1"),
            entity("A", "l1"),
            DrawingEntity::unnamed("l3"),
            entity("C", "l3"),
        ];

        let first = aggregate(&entities);
        let second = aggregate(&entities);
        assert_eq!(first, second);

        let first_json = serde_json::to_string(&first).unwrap();
        let second_json = serde_json::to_string(&second).unwrap();
        assert_eq!(first_json, second_json);
    }
}
