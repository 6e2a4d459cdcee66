//! DXTALLY 核心聚合引擎
//!
//! 提供图形实体的分类统计功能：
//! - `DrawingEntity`: 解析器产出的不可变实体记录
//! - `aggregate`: 按实体名称、图层两级分组计数
//! - `DrawingFormat`: 按文件扩展名识别格式
//!
//! 本 crate 不做任何 I/O，所有操作都是纯函数，
//! 解析与网络交互分别由 `dxtally-file` 和 `dxtally-convert` 负责。

pub mod aggregate;
pub mod entity;
pub mod format;

pub mod prelude {
    //! 常用类型的便捷导入
    pub use crate::aggregate::{aggregate, AggregationResult};
    pub use crate::entity::{DrawingEntity, EntityGroup, LayerCount, UNDEFINED_LAYER};
    pub use crate::format::DrawingFormat;
}
