/// Generates the boilerplate operator impls for single-field value newtypes.
///
/// `op!(binary Vnd, Add, add)` implements `Add for Vnd` by delegating to the
/// inner field, and similarly for the `inplace` (e.g. `AddAssign`) and
/// `unary` (e.g. `Neg`) forms.
#[macro_export]
macro_rules! op {
    (binary $ty:ty, $op:ident, $method:ident) => {
        impl $op for $ty {
            type Output = Self;

            fn $method(self, rhs: Self) -> Self::Output {
                Self(self.0.$method(rhs.0))
            }
        }
    };
    (inplace $ty:ty, $op:ident, $method:ident) => {
        impl $op for $ty {
            fn $method(&mut self, rhs: Self) {
                self.0.$method(rhs.0);
            }
        }
    };
    (unary $ty:ty, $op:ident, $method:ident) => {
        impl $op for $ty {
            type Output = Self;

            fn $method(self) -> Self::Output {
                Self(self.0.$method())
            }
        }
    };
}
