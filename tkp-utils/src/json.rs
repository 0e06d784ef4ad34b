use anyhow::{anyhow, Result};
use flate2::{read::ZlibDecoder, write::ZlibEncoder, Compression};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{to_string, to_value, Map, Value};
use std::{
    fs,
    io::{Read, Write},
};

pub fn dejsonify<'a, T>(json_str: &'a str) -> serde_json::Result<T>
where
    T: Deserialize<'a>,
{
    serde_json::from_str::<T>(json_str)
}

/// Serializes `obj` with object keys sorted at every level, so equal values
/// always produce byte-identical output.
pub fn jsonify<T>(obj: &T) -> Result<String>
where
    T: Serialize,
{
    Ok(to_string(&sort_keys(&to_value(obj)?))?)
}

pub fn sort_keys(json_value: &Value) -> Value {
    match json_value {
        Value::Object(obj) => {
            let mut sorted_map = Map::new();
            let mut keys: Vec<&String> = obj.keys().collect();
            keys.sort();
            for key in keys {
                if let Some(value) = obj.get(key) {
                    sorted_map.insert(key.clone(), sort_keys(value));
                }
            }
            Value::Object(sorted_map)
        }
        Value::Array(items) => Value::Array(items.iter().map(sort_keys).collect()),
        _ => json_value.clone(),
    }
}

pub fn decompress_obj<T>(input: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    let mut decoder = ZlibDecoder::new(input);
    let mut decompressed = String::new();
    decoder.read_to_string(&mut decompressed)?;
    Ok(dejsonify(&decompressed)?)
}

pub fn compress_obj<T>(input: &T) -> Result<Vec<u8>>
where
    T: Serialize,
{
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(jsonify(input)?.as_bytes())?;
    Ok(encoder.finish()?)
}

/// Resolves a command line JSON argument: `-` reads stdin, anything ending in
/// `.json` is read from disk, everything else is taken as inline JSON.
pub fn read_json_arg(arg: &str) -> Result<String> {
    if arg == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| anyhow!("Failed to read from stdin: {}", e))?;
        Ok(buffer)
    } else if arg.ends_with(".json") {
        fs::read_to_string(arg).map_err(|e| anyhow!("Failed to read file {}: {}", arg, e))
    } else {
        Ok(arg.to_string())
    }
}

/// Parses a JSON object argument (see [`read_json_arg`]) into a map.
pub fn load_json_map(arg: &str) -> Result<Map<String, Value>> {
    let raw = read_json_arg(arg)?;
    match dejsonify::<Value>(&raw)? {
        Value::Object(map) => Ok(map),
        other => Err(anyhow!("Expected a JSON object, got: {}", other)),
    }
}
