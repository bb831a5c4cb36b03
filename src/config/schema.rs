use serde_json::{json, Value};
use std::sync::LazyLock;

pub static CONFIG_SCHEMA: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "properties": {
            "exemption": {
                "type": "object",
                "properties": {
                    "bug": {
                        "type": "array",
                        "items": {
                            "oneOf": [
                                { "type": "string", "minLength": 1 },
                                { "$ref": "#/definitions/bug" }
                            ]
                        }
                    },
                    "scope": {
                        "type": "array",
                        "items": {
                            "oneOf": [
                                { "type": "string", "minLength": 1 },
                                { "$ref": "#/definitions/scope" }
                            ]
                        }
                    },
                    "unassessed": {
                        "oneOf": [
                            { "type": "string", "enum": ["all", "known", "off"] },
                            { "type": "boolean" },
                            {
                                "type": "object",
                                "properties": {
                                    "mode": { "type": "string", "enum": ["all", "known", "off"] },
                                    "reason": { "type": "string" }
                                }
                            }
                        ]
                    }
                },
                "additionalProperties": false
            },
            "database": {
                "type": "object",
                "properties": {
                    "path": { "type": "string" }
                }
            },
            "output": {
                "type": "object",
                "properties": {
                    "format": { "type": "string", "enum": ["markdown", "json"] }
                }
            }
        },
        "definitions": {
            "bug": {
                "type": "object",
                "required": ["id"],
                "properties": {
                    "id": { "type": "string", "minLength": 1 },
                    "reason": { "type": "string" },
                    "libraries": {
                        "oneOf": [
                            { "type": "string" },
                            { "type": "array", "items": { "type": "string" } }
                        ]
                    }
                }
            },
            "scope": {
                "type": "object",
                "required": ["pattern"],
                "properties": {
                    "pattern": { "type": "string", "minLength": 1 },
                    "reason": { "type": "string" }
                }
            }
        }
    })
});
