//! Vertex buffer bookkeeping.
//!
//! A [`NamedBuffer`] remembers which GPU buffer backs a vertex attribute and
//! how the attribute reads it ([`AttributeLayout`]).

/// Scalar type of a single attribute component, as stored in the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentType {
    Byte,
    UnsignedByte,
    Short,
    UnsignedShort,
    Int,
    UnsignedInt,
    Float,
}

impl ComponentType {
    /// The GL enum for this component type.
    pub fn gl_enum(self) -> u32 {
        match self {
            ComponentType::Byte => glow::BYTE,
            ComponentType::UnsignedByte => glow::UNSIGNED_BYTE,
            ComponentType::Short => glow::SHORT,
            ComponentType::UnsignedShort => glow::UNSIGNED_SHORT,
            ComponentType::Int => glow::INT,
            ComponentType::UnsignedInt => glow::UNSIGNED_INT,
            ComponentType::Float => glow::FLOAT,
        }
    }
}

/// How a vertex attribute reads its buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeLayout {
    /// Components per vertex (1 to 4).
    pub components: i32,
    pub component_type: ComponentType,
    /// Map integer components to `[0, 1]` / `[-1, 1]`.
    pub normalized: bool,
    /// Bytes between consecutive vertices; `0` means tightly packed.
    pub stride: i32,
    /// Byte offset of the first component.
    pub offset: i32,
}

impl AttributeLayout {
    /// A tightly packed layout starting at offset 0, not normalized.
    pub fn new(components: i32, component_type: ComponentType) -> Self {
        Self {
            components,
            component_type,
            normalized: false,
            stride: 0,
            offset: 0,
        }
    }

    pub fn normalized(mut self, normalized: bool) -> Self {
        self.normalized = normalized;
        self
    }

    pub fn stride(mut self, stride: i32) -> Self {
        self.stride = stride;
        self
    }

    pub fn offset(mut self, offset: i32) -> Self {
        self.offset = offset;
        self
    }
}

/// A GPU buffer together with the attribute it feeds.
#[derive(Debug, Clone, Copy)]
pub struct NamedBuffer<B> {
    pub buffer: B,
    pub attribute_location: u32,
    pub layout: AttributeLayout,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_defaults() {
        let layout = AttributeLayout::new(3, ComponentType::UnsignedByte);
        assert!(!layout.normalized);
        assert_eq!(layout.stride, 0);
        assert_eq!(layout.offset, 0);

        let layout = layout.normalized(true).stride(8).offset(4);
        assert_eq!(
            layout,
            AttributeLayout {
                components: 3,
                component_type: ComponentType::UnsignedByte,
                normalized: true,
                stride: 8,
                offset: 4,
            }
        );
    }
}
