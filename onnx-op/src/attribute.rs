use vm::Tensor;

/// 模型中声明的 ONNX 节点属性。
#[derive(Clone, Debug)]
pub enum Attribute {
    Int(i64),
    Float(f32),
    Ints(Vec<i64>),
    Floats(Vec<f32>),
    String(String),
    Tensor(Tensor),
}

macro_rules! impl_from {
    ($( $ty:ty => $variant:ident )+) => {
        $(
            impl From<$ty> for Attribute {
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }
        )+
    };
}

impl_from! {
    i64      => Int
    f32      => Float
    Vec<i64> => Ints
    Vec<f32> => Floats
    String   => String
    Tensor   => Tensor
}

impl From<&str> for Attribute {
    fn from(value: &str) -> Self {
        Self::String(value.into())
    }
}

impl Attribute {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(val) => Some(*val),
            _ => None,
        }
    }

    pub fn as_ints(&self) -> Option<&[i64]> {
        match self {
            Self::Ints(val) => Some(val),
            _ => None,
        }
    }
}
