//! DXF文件解析
//!
//! 把DXF字节流转成实体记录序列。只提取统计需要的两个属性：
//! 语义名称和图层，几何数据全部忽略。

use std::io::Cursor;

use dxtally_core::entity::DrawingEntity;

use crate::error::FileError;

/// 解析DXF字节流中的模型空间实体
///
/// 解析失败返回 `FileError::Dxf`，由调用方决定如何降级
/// （服务端把它转成空结果加诊断提示，不向后传播）。
pub fn parse_entities(bytes: &[u8]) -> Result<Vec<DrawingEntity>, FileError> {
    let mut reader = Cursor::new(bytes);
    let drawing = dxf::Drawing::load(&mut reader).map_err(|e| FileError::Dxf(e.to_string()))?;

    let entities: Vec<DrawingEntity> = drawing.entities().map(convert_dxf_entity).collect();

    tracing::debug!("parsed {} entities from DXF stream", entities.len());

    Ok(entities)
}

/// 将DXF实体转换为实体记录
///
/// 名称映射沿用产品既有行为：只有块引用（INSERT）带语义名称，
/// 原始几何体（线、圆等）没有名称，统计时会被排除。
fn convert_dxf_entity(entity: &dxf::entities::Entity) -> DrawingEntity {
    let kind = match &entity.specific {
        dxf::entities::EntityType::Insert(insert) if !insert.name.is_empty() => {
            Some(insert.name.clone())
        }
        _ => None,
    };

    let layer = if entity.common.layer.is_empty() {
        None
    } else {
        Some(entity.common.layer.clone())
    };

    DrawingEntity { kind, layer }
}
