use crate::error::{EvalErr, EvalResult};
use crate::form::Form;
use num::complex::Complex64;
use std::cmp::Ordering;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Op { Add, Sub, Mul, Div }

/// Numeric view of a form; the variant order is the promotion order.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Num {
    Int(i64),
    Real(f64),
    Cplx(Complex64),
}

impl Num {
    fn from_form(form: &Form) -> Result<Num, EvalErr> {
        match *form {
            Form::Integer(n) => Ok(Num::Int(n)),
            Form::Float(x) => Ok(Num::Real(x)),
            Form::Complex(c) => Ok(Num::Cplx(c)),
            ref other => Err(EvalErr::Type(format!("not number: {}", other.written()))),
        }
    }

    fn real(self) -> Option<f64> {
        match self {
            Num::Int(n) => Some(n as f64),
            Num::Real(x) => Some(x),
            Num::Cplx(_) => None,
        }
    }

    fn complex(self) -> Complex64 {
        match self {
            Num::Int(n) => Complex64::new(n as f64, 0.0),
            Num::Real(x) => Complex64::new(x, 0.0),
            Num::Cplx(c) => c,
        }
    }
}

fn not_real(form: &Form) -> EvalErr {
    EvalErr::Type(format!("not real: {}", form.written()))
}

fn real(form: &Form) -> Result<f64, EvalErr> {
    Num::from_form(form)?.real().ok_or_else(|| not_real(form))
}

// None when the exact result doesn't fit, or division isn't exact
fn int_op(op: Op, x: i64, y: i64) -> Option<i64> {
    match op {
        Op::Add => x.checked_add(y),
        Op::Sub => x.checked_sub(y),
        Op::Mul => x.checked_mul(y),
        Op::Div => match x.checked_rem(y) {
            Some(0) => x.checked_div(y),
            _ => None,
        },
    }
}

fn real_op(op: Op, x: f64, y: f64) -> f64 {
    match op {
        Op::Add => x + y,
        Op::Sub => x - y,
        Op::Mul => x * y,
        Op::Div => x / y,
    }
}

fn complex_op(op: Op, x: Complex64, y: Complex64) -> Complex64 {
    match op {
        Op::Add => x + y,
        Op::Sub => x - y,
        Op::Mul => x * y,
        Op::Div => x / y,
    }
}

pub fn arith(op: Op, a: &Form, b: &Form) -> EvalResult {
    let (x, y) = (Num::from_form(a)?, Num::from_form(b)?);
    Ok(match (x, y) {
        (Num::Int(i), Num::Int(j)) => match int_op(op, i, j) {
            Some(n) => Form::Integer(n),
            None => Form::Float(real_op(op, i as f64, j as f64)),
        },
        (Num::Cplx(_), _) | (_, Num::Cplx(_)) =>
            Form::Complex(complex_op(op, x.complex(), y.complex())),
        _ => match (x.real(), y.real()) {
            (Some(i), Some(j)) => Form::Float(real_op(op, i, j)),
            _ => Form::Complex(complex_op(op, x.complex(), y.complex())),
        },
    })
}

pub fn negate(a: &Form) -> EvalResult {
    Ok(match Num::from_form(a)? {
        Num::Int(n) => n.checked_neg().map(Form::Integer)
            .unwrap_or(Form::Float(-(n as f64))),
        Num::Real(x) => Form::Float(-x),
        Num::Cplx(c) => Form::Complex(-c),
    })
}

/// Ordering of two real numbers, `None` when either is NaN. Complex
/// operands have no order.
pub fn compare(a: &Form, b: &Form) -> Result<Option<Ordering>, EvalErr> {
    if let (Form::Integer(i), Form::Integer(j)) = (a, b) {
        return Ok(Some(i.cmp(j)));
    }
    Ok(real(a)?.partial_cmp(&real(b)?))
}

fn close(x: f64, y: f64) -> bool {
    x == y || (x - y).abs() <= f64::EPSILON * 1f64.max(x.abs()).max(y.abs())
}

/// Numeric `=`. Inexact operands compare within a relative epsilon.
pub fn equal(a: &Form, b: &Form) -> Result<bool, EvalErr> {
    let (x, y) = (Num::from_form(a)?, Num::from_form(b)?);
    Ok(match (x, y) {
        (Num::Int(i), Num::Int(j)) => i == j,
        _ => {
            let (x, y) = (x.complex(), y.complex());
            close(x.re, y.re) && close(x.im, y.im)
        },
    })
}

pub fn abs(a: &Form) -> EvalResult {
    Ok(match Num::from_form(a)? {
        Num::Int(n) => n.checked_abs().map(Form::Integer)
            .unwrap_or(Form::Float((n as f64).abs())),
        Num::Real(x) => Form::Float(x.abs()),
        Num::Cplx(c) => Form::Float(c.norm()),
    })
}

/// Square root; negative reals yield an imaginary result.
pub fn sqrt(a: &Form) -> EvalResult {
    Ok(match Num::from_form(a)? {
        Num::Cplx(c) => Form::Complex(c.sqrt()),
        num => match num.real() {
            Some(x) if x < 0.0 => Form::Complex(Complex64::new(0.0, (-x).sqrt())),
            Some(x) => Form::Float(x.sqrt()),
            None => return Err(not_real(a)),
        },
    })
}

pub fn exp(a: &Form) -> EvalResult {
    Ok(match Num::from_form(a)? {
        Num::Cplx(c) => Form::Complex(c.exp()),
        num => Form::Float(num.real().map(f64::exp).unwrap_or(f64::NAN)),
    })
}

pub fn expt(base: &Form, power: &Form) -> EvalResult {
    let (x, y) = (Num::from_form(base)?, Num::from_form(power)?);
    Ok(match (x, y) {
        (Num::Int(b), Num::Int(p)) if p >= 0 => {
            let exact = u32::try_from(p).ok().and_then(|p| b.checked_pow(p));
            match exact {
                Some(n) => Form::Integer(n),
                None => Form::Float((b as f64).powf(p as f64)),
            }
        },
        (Num::Cplx(_), _) | (_, Num::Cplx(_)) => Form::Complex(x.complex().powc(y.complex())),
        _ => match (x.real(), y.real()) {
            (Some(b), Some(p)) if b < 0.0 && p.fract() != 0.0 =>
                Form::Complex(x.complex().powf(p)),
            (Some(b), Some(p)) => Form::Float(b.powf(p)),
            _ => Form::Complex(x.complex().powc(y.complex())),
        },
    })
}

pub fn round(a: &Form) -> EvalResult {
    match Num::from_form(a)? {
        Num::Int(n) => Ok(Form::Integer(n)),
        Num::Real(x) => Ok(Form::Float(x.round())),
        Num::Cplx(_) => Err(not_real(a)),
    }
}

///////////////////////////////////////////////////////////////////////////////
