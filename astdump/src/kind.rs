//! Declaration and reference kind taxonomy.
//!
//! Raw codes are libclang `CXCursorKind` values. Textual names follow the
//! SourceKit UID spelling (`source.lang.swift.decl.function.free`, ...), which
//! is what the rest of the documentation toolchain keys on.

use crate::error::UnknownKind;
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Stable declaration/reference kind of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DeclarationKind {
    DeclFunctionFree,
    RefFunctionFree,
    DeclMethodInstance,
    RefMethodInstance,
    DeclMethodStatic,
    RefMethodStatic,
    DeclMethodClass,
    RefMethodClass,
    DeclAccessorGetter,
    RefAccessorGetter,
    DeclAccessorSetter,
    RefAccessorSetter,
    DeclAccessorWillSet,
    RefAccessorWillSet,
    DeclAccessorDidSet,
    RefAccessorDidSet,
    DeclConstructor,
    RefConstructor,
    DeclDestructor,
    RefDestructor,
    DeclFunctionOperator,
    RefFunctionOperator,
    DeclSubscript,
    RefSubscript,
    DeclVarGlobal,
    RefVarGlobal,
    DeclVarInstance,
    RefVarInstance,
    DeclVarStatic,
    RefVarStatic,
    DeclVarClass,
    RefVarClass,
    DeclVarLocal,
    RefVarLocal,
    DeclClass,
    RefClass,
    DeclStruct,
    RefStruct,
    DeclEnum,
    RefEnum,
    DeclEnumElement,
    RefEnumElement,
    DeclProtocol,
    RefProtocol,
    DeclExtensionStruct,
    DeclExtensionClass,
    DeclExtensionEnum,
    DeclTypeAlias,
    RefTypeAlias,
    DeclGenericTypeParam,
    RefGenericTypeParam,
    RefModule,
    /// Sentinel for kinds the taxonomy does not know about.
    Unknown,
}

/// Raw `CXCursorKind` values understood by the taxonomy.
pub mod raw {
    pub const STRUCT_DECL: u32 = 2;
    pub const UNION_DECL: u32 = 3;
    pub const CLASS_DECL: u32 = 4;
    pub const ENUM_DECL: u32 = 5;
    pub const FIELD_DECL: u32 = 6;
    pub const ENUM_CONSTANT_DECL: u32 = 7;
    pub const FUNCTION_DECL: u32 = 8;
    pub const VAR_DECL: u32 = 9;
    pub const PARM_DECL: u32 = 10;
    pub const OBJC_INTERFACE_DECL: u32 = 11;
    pub const OBJC_CATEGORY_DECL: u32 = 12;
    pub const OBJC_PROTOCOL_DECL: u32 = 13;
    pub const OBJC_PROPERTY_DECL: u32 = 14;
    pub const OBJC_IVAR_DECL: u32 = 15;
    pub const OBJC_INSTANCE_METHOD_DECL: u32 = 16;
    pub const OBJC_CLASS_METHOD_DECL: u32 = 17;
    pub const TYPEDEF_DECL: u32 = 20;
    pub const CXX_METHOD: u32 = 21;
    pub const CONSTRUCTOR: u32 = 24;
    pub const DESTRUCTOR: u32 = 25;
    pub const CONVERSION_FUNCTION: u32 = 26;
    pub const TEMPLATE_TYPE_PARAMETER: u32 = 27;
    pub const TYPE_ALIAS_DECL: u32 = 36;
    pub const OBJC_SUPER_CLASS_REF: u32 = 40;
    pub const OBJC_PROTOCOL_REF: u32 = 41;
    pub const OBJC_CLASS_REF: u32 = 42;
    pub const TYPE_REF: u32 = 43;
    pub const CXX_BASE_SPECIFIER: u32 = 44;
    pub const NAMESPACE_REF: u32 = 46;
    pub const MEMBER_REF: u32 = 47;
    pub const VARIABLE_REF: u32 = 50;
    pub const DECL_REF_EXPR: u32 = 101;
    pub const MEMBER_REF_EXPR: u32 = 102;
    pub const CALL_EXPR: u32 = 103;
    pub const MODULE_IMPORT_DECL: u32 = 600;
}

static RAW_CODES: &[(u32, DeclarationKind)] = &[
    (raw::STRUCT_DECL, DeclarationKind::DeclStruct),
    (raw::UNION_DECL, DeclarationKind::DeclStruct),
    (raw::CLASS_DECL, DeclarationKind::DeclClass),
    (raw::ENUM_DECL, DeclarationKind::DeclEnum),
    (raw::FIELD_DECL, DeclarationKind::DeclVarInstance),
    (raw::ENUM_CONSTANT_DECL, DeclarationKind::DeclEnumElement),
    (raw::FUNCTION_DECL, DeclarationKind::DeclFunctionFree),
    (raw::VAR_DECL, DeclarationKind::DeclVarGlobal),
    (raw::PARM_DECL, DeclarationKind::DeclVarLocal),
    (raw::OBJC_INTERFACE_DECL, DeclarationKind::DeclClass),
    (raw::OBJC_CATEGORY_DECL, DeclarationKind::DeclExtensionClass),
    (raw::OBJC_PROTOCOL_DECL, DeclarationKind::DeclProtocol),
    (raw::OBJC_PROPERTY_DECL, DeclarationKind::DeclVarInstance),
    (raw::OBJC_IVAR_DECL, DeclarationKind::DeclVarInstance),
    (raw::OBJC_INSTANCE_METHOD_DECL, DeclarationKind::DeclMethodInstance),
    (raw::OBJC_CLASS_METHOD_DECL, DeclarationKind::DeclMethodClass),
    (raw::TYPEDEF_DECL, DeclarationKind::DeclTypeAlias),
    (raw::CXX_METHOD, DeclarationKind::DeclMethodInstance),
    (raw::CONSTRUCTOR, DeclarationKind::DeclConstructor),
    (raw::DESTRUCTOR, DeclarationKind::DeclDestructor),
    (raw::CONVERSION_FUNCTION, DeclarationKind::DeclFunctionOperator),
    (raw::TEMPLATE_TYPE_PARAMETER, DeclarationKind::DeclGenericTypeParam),
    (raw::TYPE_ALIAS_DECL, DeclarationKind::DeclTypeAlias),
    (raw::OBJC_SUPER_CLASS_REF, DeclarationKind::RefClass),
    (raw::OBJC_PROTOCOL_REF, DeclarationKind::RefProtocol),
    (raw::OBJC_CLASS_REF, DeclarationKind::RefClass),
    (raw::TYPE_REF, DeclarationKind::RefTypeAlias),
    (raw::CXX_BASE_SPECIFIER, DeclarationKind::RefClass),
    (raw::NAMESPACE_REF, DeclarationKind::RefModule),
    (raw::MEMBER_REF, DeclarationKind::RefVarInstance),
    (raw::VARIABLE_REF, DeclarationKind::RefVarLocal),
    (raw::DECL_REF_EXPR, DeclarationKind::RefVarGlobal),
    (raw::MEMBER_REF_EXPR, DeclarationKind::RefVarInstance),
    (raw::CALL_EXPR, DeclarationKind::RefFunctionFree),
    (raw::MODULE_IMPORT_DECL, DeclarationKind::RefModule),
];

static BY_CODE: LazyLock<HashMap<u32, DeclarationKind>> =
    LazyLock::new(|| RAW_CODES.iter().copied().collect());

static BY_NAME: LazyLock<HashMap<&'static str, DeclarationKind>> =
    LazyLock::new(|| DeclarationKind::ALL.iter().map(|k| (k.name(), *k)).collect());

impl DeclarationKind {
    /// Every kind, sentinel included.
    pub const ALL: [DeclarationKind; 53] = [
        Self::DeclFunctionFree,
        Self::RefFunctionFree,
        Self::DeclMethodInstance,
        Self::RefMethodInstance,
        Self::DeclMethodStatic,
        Self::RefMethodStatic,
        Self::DeclMethodClass,
        Self::RefMethodClass,
        Self::DeclAccessorGetter,
        Self::RefAccessorGetter,
        Self::DeclAccessorSetter,
        Self::RefAccessorSetter,
        Self::DeclAccessorWillSet,
        Self::RefAccessorWillSet,
        Self::DeclAccessorDidSet,
        Self::RefAccessorDidSet,
        Self::DeclConstructor,
        Self::RefConstructor,
        Self::DeclDestructor,
        Self::RefDestructor,
        Self::DeclFunctionOperator,
        Self::RefFunctionOperator,
        Self::DeclSubscript,
        Self::RefSubscript,
        Self::DeclVarGlobal,
        Self::RefVarGlobal,
        Self::DeclVarInstance,
        Self::RefVarInstance,
        Self::DeclVarStatic,
        Self::RefVarStatic,
        Self::DeclVarClass,
        Self::RefVarClass,
        Self::DeclVarLocal,
        Self::RefVarLocal,
        Self::DeclClass,
        Self::RefClass,
        Self::DeclStruct,
        Self::RefStruct,
        Self::DeclEnum,
        Self::RefEnum,
        Self::DeclEnumElement,
        Self::RefEnumElement,
        Self::DeclProtocol,
        Self::RefProtocol,
        Self::DeclExtensionStruct,
        Self::DeclExtensionClass,
        Self::DeclExtensionEnum,
        Self::DeclTypeAlias,
        Self::RefTypeAlias,
        Self::DeclGenericTypeParam,
        Self::RefGenericTypeParam,
        Self::RefModule,
        Self::Unknown,
    ];

    /// Map a raw `CXCursorKind` code.
    pub fn from_raw_code(code: u32) -> Result<Self, UnknownKind> {
        BY_CODE.get(&code).copied().ok_or(UnknownKind::Code(code))
    }

    /// Inverse of [`DeclarationKind::name`].
    pub fn from_name(name: &str) -> Result<Self, UnknownKind> {
        BY_NAME
            .get(name)
            .copied()
            .ok_or_else(|| UnknownKind::Name(name.to_string()))
    }

    /// Canonical textual name.
    pub fn name(self) -> &'static str {
        match self {
            Self::DeclFunctionFree => "source.lang.swift.decl.function.free",
            Self::RefFunctionFree => "source.lang.swift.ref.function.free",
            Self::DeclMethodInstance => "source.lang.swift.decl.function.method.instance",
            Self::RefMethodInstance => "source.lang.swift.ref.function.method.instance",
            Self::DeclMethodStatic => "source.lang.swift.decl.function.method.static",
            Self::RefMethodStatic => "source.lang.swift.ref.function.method.static",
            Self::DeclMethodClass => "source.lang.swift.decl.function.method.class",
            Self::RefMethodClass => "source.lang.swift.ref.function.method.class",
            Self::DeclAccessorGetter => "source.lang.swift.decl.function.accessor.getter",
            Self::RefAccessorGetter => "source.lang.swift.ref.function.accessor.getter",
            Self::DeclAccessorSetter => "source.lang.swift.decl.function.accessor.setter",
            Self::RefAccessorSetter => "source.lang.swift.ref.function.accessor.setter",
            Self::DeclAccessorWillSet => "source.lang.swift.decl.function.accessor.willset",
            Self::RefAccessorWillSet => "source.lang.swift.ref.function.accessor.willset",
            Self::DeclAccessorDidSet => "source.lang.swift.decl.function.accessor.didset",
            Self::RefAccessorDidSet => "source.lang.swift.ref.function.accessor.didset",
            Self::DeclConstructor => "source.lang.swift.decl.function.constructor",
            Self::RefConstructor => "source.lang.swift.ref.function.constructor",
            Self::DeclDestructor => "source.lang.swift.decl.function.destructor",
            Self::RefDestructor => "source.lang.swift.ref.function.destructor",
            Self::DeclFunctionOperator => "source.lang.swift.decl.function.operator",
            Self::RefFunctionOperator => "source.lang.swift.ref.function.operator",
            Self::DeclSubscript => "source.lang.swift.decl.function.subscript",
            Self::RefSubscript => "source.lang.swift.ref.function.subscript",
            Self::DeclVarGlobal => "source.lang.swift.decl.var.global",
            Self::RefVarGlobal => "source.lang.swift.ref.var.global",
            Self::DeclVarInstance => "source.lang.swift.decl.var.instance",
            Self::RefVarInstance => "source.lang.swift.ref.var.instance",
            Self::DeclVarStatic => "source.lang.swift.decl.var.static",
            Self::RefVarStatic => "source.lang.swift.ref.var.static",
            Self::DeclVarClass => "source.lang.swift.decl.var.class",
            Self::RefVarClass => "source.lang.swift.ref.var.class",
            Self::DeclVarLocal => "source.lang.swift.decl.var.local",
            Self::RefVarLocal => "source.lang.swift.ref.var.local",
            Self::DeclClass => "source.lang.swift.decl.class",
            Self::RefClass => "source.lang.swift.ref.class",
            Self::DeclStruct => "source.lang.swift.decl.struct",
            Self::RefStruct => "source.lang.swift.ref.struct",
            Self::DeclEnum => "source.lang.swift.decl.enum",
            Self::RefEnum => "source.lang.swift.ref.enum",
            Self::DeclEnumElement => "source.lang.swift.decl.enumelement",
            Self::RefEnumElement => "source.lang.swift.ref.enumelement",
            Self::DeclProtocol => "source.lang.swift.decl.protocol",
            Self::RefProtocol => "source.lang.swift.ref.protocol",
            Self::DeclExtensionStruct => "source.lang.swift.decl.extension.struct",
            Self::DeclExtensionClass => "source.lang.swift.decl.extension.class",
            Self::DeclExtensionEnum => "source.lang.swift.decl.extension.enum",
            Self::DeclTypeAlias => "source.lang.swift.decl.typealias",
            Self::RefTypeAlias => "source.lang.swift.ref.typealias",
            Self::DeclGenericTypeParam => "source.lang.swift.decl.generic_type_param",
            Self::RefGenericTypeParam => "source.lang.swift.ref.generic_type_param",
            Self::RefModule => "source.lang.swift.ref.module",
            Self::Unknown => "source.lang.unknown",
        }
    }

    pub fn is_reference(self) -> bool {
        self.name().starts_with("source.lang.swift.ref.")
    }

    /// Whether protocol references nested in this declaration are conformances.
    pub fn accepts_conformances(self) -> bool {
        matches!(
            self,
            Self::DeclClass
                | Self::DeclStruct
                | Self::DeclEnum
                | Self::DeclProtocol
                | Self::DeclExtensionStruct
                | Self::DeclExtensionClass
                | Self::DeclExtensionEnum
        )
    }
}

impl fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashSet;

    #[test]
    fn names_round_trip_for_every_kind() {
        for kind in DeclarationKind::ALL {
            assert_eq!(DeclarationKind::from_name(kind.name()), Ok(kind));
        }
    }

    #[test]
    fn names_are_distinct() {
        let names: HashSet<_> = DeclarationKind::ALL.iter().map(|k| k.name()).collect();
        assert_eq!(names.len(), DeclarationKind::ALL.len());
    }

    #[rstest]
    #[case(raw::FUNCTION_DECL, DeclarationKind::DeclFunctionFree)]
    #[case(raw::STRUCT_DECL, DeclarationKind::DeclStruct)]
    #[case(raw::UNION_DECL, DeclarationKind::DeclStruct)]
    #[case(raw::OBJC_PROTOCOL_REF, DeclarationKind::RefProtocol)]
    #[case(raw::OBJC_CATEGORY_DECL, DeclarationKind::DeclExtensionClass)]
    #[case(raw::TYPEDEF_DECL, DeclarationKind::DeclTypeAlias)]
    #[case(raw::MODULE_IMPORT_DECL, DeclarationKind::RefModule)]
    fn raw_codes_map_to_kinds(#[case] code: u32, #[case] expected: DeclarationKind) {
        assert_eq!(DeclarationKind::from_raw_code(code), Ok(expected));
    }

    #[test]
    fn unlisted_code_is_unknown() {
        assert_eq!(
            DeclarationKind::from_raw_code(22),
            Err(UnknownKind::Code(22))
        );
    }

    #[test]
    fn unlisted_name_is_unknown() {
        assert_eq!(
            DeclarationKind::from_name("source.lang.swift.decl.actor"),
            Err(UnknownKind::Name("source.lang.swift.decl.actor".to_string()))
        );
    }

    #[test]
    fn reference_kinds() {
        assert!(DeclarationKind::RefProtocol.is_reference());
        assert!(DeclarationKind::RefModule.is_reference());
        assert!(!DeclarationKind::DeclProtocol.is_reference());
        assert!(!DeclarationKind::Unknown.is_reference());
    }

    #[test]
    fn conformance_hosts() {
        assert!(DeclarationKind::DeclClass.accepts_conformances());
        assert!(DeclarationKind::DeclExtensionEnum.accepts_conformances());
        assert!(!DeclarationKind::DeclFunctionFree.accepts_conformances());
    }
}
