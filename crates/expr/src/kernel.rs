//! # Loop Kernels
//!
//! Turns a [`LazyArray`] into the pieces a polyhedral loop generator
//! consumes: an iteration domain, a single assignment instruction and the
//! argument list. Compiling and launching the kernel is left to the caller.
//!
//! ```text
//! rate = exp(-8590.0 / temperature) * concentration[0] * concentration[1]
//!
//! domain:      {[i0] : 0 <= i0 <= 0}
//! instruction: rate[i0] = exp(-8590.0 / temperature[i0]) * concentration[0, i0] * concentration[1, i0]
//! ```
//!
//! Every array reference carries one loop index per axis, aligned to the
//! trailing loop indices. Axes of extent 1 that are broadcast against a
//! longer output axis are pinned to index `0`.

use std::collections::BTreeMap;

use log::debug;
use symgrad_core::Shape;

use crate::error::CodegenError;
use crate::lazy::LazyArray;
use crate::mapper::CodeGenerationMapper;
use crate::node::{Expr, Index};
use crate::precedence::Precedence;

/// Renders the right-hand side of a loop-body assignment.
pub struct KernelMapper<'a> {
    inputs: &'a BTreeMap<String, Shape>,
    output: &'a Shape,
}

impl<'a> KernelMapper<'a> {
    pub fn new(inputs: &'a BTreeMap<String, Shape>, output: &'a Shape) -> Self {
        Self { inputs, output }
    }

    /// Loop indices addressing an array of extents `dims` inside the
    /// output domain.
    fn indices(&self, dims: &[usize]) -> Vec<String> {
        let offset = self.output.rank().saturating_sub(dims.len());
        dims.iter()
            .enumerate()
            .map(|(axis, &extent)| {
                let loop_axis = offset + axis;
                let out_extent = self.output.dims.get(loop_axis).copied().unwrap_or(1);
                if extent == 1 && out_extent != 1 {
                    "0".to_string()
                } else {
                    format!("i{}", loop_axis)
                }
            })
            .collect()
    }
}

impl CodeGenerationMapper for KernelMapper<'_> {
    fn target_name(&self) -> &'static str {
        "kernel"
    }

    fn map_variable(&self, name: &str, _enclosing: Precedence) -> String {
        match self.inputs.get(name) {
            Some(shape) if !shape.is_scalar() => {
                format!("{}[{}]", name, self.indices(shape.as_slice()).join(", "))
            }
            _ => name.to_string(),
        }
    }

    fn map_call(&self, function: &Expr, argument: &Expr, _enclosing: Precedence) -> String {
        let function = match function.name() {
            Some(name) => name.to_string(),
            None => self.rec(function, Precedence::Call),
        };
        format!("{}({})", function, self.rec(argument, Precedence::Call))
    }

    fn map_subscript(&self, base: &Expr, index: &Index, _enclosing: Precedence) -> String {
        let shape = base.name().and_then(|name| self.inputs.get(name));
        match (base.name(), shape) {
            (Some(name), Some(shape)) if !shape.is_scalar() => {
                let mut parts = vec![self.render_index(index)];
                parts.extend(self.indices(&shape.as_slice()[1..]));
                format!("{}[{}]", name, parts.join(", "))
            }
            _ => format!(
                "{}[{}]",
                self.rec(base, Precedence::Subscript),
                self.render_index(index)
            ),
        }
    }
}

/// One array a kernel reads or writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KernelArgument {
    pub name: String,
    pub shape: Shape,
    pub is_output: bool,
}

/// An assembled loop kernel.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    pub name: String,
    /// Iteration domain, `{[i0, ...] : 0 <= i0 <= n0-1 and ...}`
    pub domain: String,
    /// `out[i0, ...] = <rhs>`
    pub instruction: String,
    /// Inputs in name order, then the output
    pub arguments: Vec<KernelArgument>,
}

/// Collects the parameters a kernel needs before it can be assembled.
#[derive(Debug, Clone, Default)]
pub struct KernelBuilder {
    name: Option<String>,
    output: Option<String>,
}

impl KernelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Kernel (function) name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Name of the array the kernel writes.
    pub fn output(mut self, output: impl Into<String>) -> Self {
        self.output = Some(output.into());
        self
    }

    /// Assemble a kernel computing `expr` over its full output shape.
    ///
    /// Fails with [`CodegenError::MissingParameter`] if the name or output
    /// was never set, and with [`CodegenError::ScalarKernel`] for a
    /// 0-dimensional result.
    pub fn build(&self, expr: &LazyArray) -> Result<Kernel, CodegenError> {
        let name = self
            .name
            .clone()
            .ok_or(CodegenError::MissingParameter { parameter: "name" })?;
        let output = self
            .output
            .clone()
            .ok_or(CodegenError::MissingParameter { parameter: "output" })?;

        let shape = expr.shape();
        if shape.is_scalar() {
            return Err(CodegenError::ScalarKernel);
        }

        let loop_vars: Vec<String> = (0..shape.rank()).map(|axis| format!("i{}", axis)).collect();
        let bounds: Vec<String> = shape
            .dims
            .iter()
            .zip(&loop_vars)
            .map(|(&extent, var)| format!("0 <= {} <= {}", var, extent as i64 - 1))
            .collect();
        let domain = format!("{{[{}] : {}}}", loop_vars.join(", "), bounds.join(" and "));

        let mapper = KernelMapper::new(expr.inputs(), shape);
        let instruction = format!(
            "{}[{}] = {}",
            output,
            loop_vars.join(", "),
            mapper.render(expr.expr())
        );
        debug!("kernel {}: domain {}", name, domain);
        debug!("kernel {}: {}", name, instruction);

        let mut arguments: Vec<KernelArgument> = expr
            .inputs()
            .iter()
            .map(|(name, shape)| KernelArgument {
                name: name.clone(),
                shape: shape.clone(),
                is_output: false,
            })
            .collect();
        arguments.push(KernelArgument {
            name: output,
            shape: shape.clone(),
            is_output: true,
        });

        Ok(Kernel {
            name,
            domain,
            instruction,
            arguments,
        })
    }
}
