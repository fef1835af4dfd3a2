use super::entity::ComponentAccess;
use super::reflection::Reference;
#[cfg(test)]
use crate::prelude::*;
use crate::reflection::shorten_type_name;

pub struct System<F> {
    name: &'static str,
    signature: Signature,
    functor: F,
}

impl<F> System<F> {
    pub fn new<Args>(functor: F) -> Self
    where
        F: SignatureAnalyzer<Args>,
    {
        let mut system = Self {
            name: shorten_type_name(std::any::type_name::<F>()),
            signature: Vec::new(),
            functor,
        };
        system.functor.add_component_accesses(&mut system.signature);
        system
    }

    pub fn get_name(&self) -> &str {
        self.name
    }

    pub fn get_signature(&self) -> &Signature {
        &self.signature
    }

    pub fn get_functor(&self) -> &F {
        &self.functor
    }
}

type Signature = Vec<ComponentAccess>;

pub enum SystemError {}

pub type SystemResult = Result<(), SystemError>;

pub trait SignatureAnalyzer<Args> {
    fn add_component_accesses(&self, signature: &mut Vec<ComponentAccess>);
}

impl<F> SignatureAnalyzer<()> for F
where
    F: Fn() -> SystemResult,
{
    fn add_component_accesses(&self, _signature: &mut Vec<ComponentAccess>) {}
}

impl<F, Args> SignatureAnalyzer<Args> for F
where
    F: Fn(Args) -> SystemResult,
    Args: Reference,
{
    fn add_component_accesses(&self, signature: &mut Vec<ComponentAccess>) {
        signature.push(ComponentAccess::new::<Args>());
    }
}

impl<F, Args0, Args1> SignatureAnalyzer<(Args0, Args1)> for F
where
    F: Fn(Args0, Args1) -> SystemResult,
    Args0: Reference,
    Args1: Reference,
{
    fn add_component_accesses(&self, signature: &mut Vec<ComponentAccess>) {
        signature.push(ComponentAccess::new::<Args0>());
        signature.push(ComponentAccess::new::<Args1>());
    }
}
