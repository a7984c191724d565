/// 准备阶段解析出的静态参数
#[derive(Clone, PartialEq, Debug)]
pub enum Arg {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Arr(Box<[Self]>),
}

macro_rules! impl_from {
    ($( $ty:ty => $variant:ident )+) => {
        $(
            impl From<$ty> for Arg {
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }
        )+
    };
}

impl_from! {
    bool   => Bool
    i64    => Int
    f64    => Float
    String => Str
    Box<[Self]> => Arr
}

impl Arg {
    pub fn bool(value: bool) -> Self {
        value.into()
    }

    pub fn int(value: i64) -> Self {
        value.into()
    }

    pub fn float(value: f64) -> Self {
        value.into()
    }

    pub fn arr(value: impl IntoIterator<Item = Self>) -> Self {
        Self::Arr(value.into_iter().collect())
    }

    pub fn ints<'a>(value: impl IntoIterator<Item = &'a i64>) -> Self {
        Self::arr(value.into_iter().copied().map(Self::Int))
    }

    pub fn to_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(val) => Some(*val),
            Self::Int(val) => Some(*val != 0),
            _ => None,
        }
    }

    pub fn to_i64(&self) -> Option<i64> {
        match self {
            Self::Int(val) => Some(*val),
            Self::Bool(val) => Some(*val as _),
            _ => None,
        }
    }

    pub fn to_i64_vec(&self) -> Option<Vec<i64>> {
        match self {
            Self::Arr(args) => args.iter().map(Self::to_i64).collect(),
            _ => None,
        }
    }
}
