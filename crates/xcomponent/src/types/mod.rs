mod function;
mod markup;
mod param_type;
mod record;
mod signature;
mod value;

pub use function::{Function, FunctionSignature, NativeFn};
pub use markup::Markup;
pub use param_type::{ParamKind, ParamType};
pub use record::Record;
pub use signature::{Param, Signature};
pub use value::{Value, ValueKind};
