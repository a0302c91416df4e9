//! 循环绑定注册表

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::testcase::{LoopParam, TestcaseFactory, TestcaseInstance};

/// 循环绑定
#[derive(Debug, Clone)]
pub struct LoopBinding {
    /// 参数名称
    pub param: String,

    /// 取值集合（按此顺序实例化）
    pub values: Vec<Value>,
}

/// 循环绑定注册表
///
/// 在运行开始前登记"测试用例定义 → 参数名 + 取值集合"，
/// 展开时每个取值生成一个独立实例。
#[derive(Default)]
pub struct LoopRegistry {
    bindings: HashMap<String, LoopBinding>,
}

impl LoopRegistry {
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// 登记循环绑定
    ///
    /// 对同一定义重复登记时，后写覆盖先写。
    pub fn mark(&mut self, testcase: &str, param: &str, values: Vec<Value>) {
        if self.bindings.contains_key(testcase) {
            debug!("测试用例 {} 的循环绑定被覆盖", testcase);
        }
        self.bindings.insert(
            testcase.to_string(),
            LoopBinding {
                param: param.to_string(),
                values,
            },
        );
    }

    /// 查询循环绑定
    pub fn binding(&self, testcase: &str) -> Option<&LoopBinding> {
        self.bindings.get(testcase)
    }

    /// 按定义顺序展开全部实例
    ///
    /// 有绑定的定义按取值顺序生成实例，空取值集合生成零个实例
    /// （不是错误）；无绑定的定义恰好生成一个无参数实例。
    pub fn expand(&self, factories: &[Arc<dyn TestcaseFactory>]) -> Vec<TestcaseInstance> {
        let mut instances = Vec::new();

        for factory in factories {
            match self.bindings.get(factory.name()) {
                Some(binding) => {
                    for value in &binding.values {
                        let param = LoopParam {
                            name: binding.param.clone(),
                            value: value.clone(),
                        };
                        let name = format!(
                            "{}[{}={}]",
                            factory.name(),
                            param.name,
                            param.display_value()
                        );
                        let testcase = factory.create(Some(&param));
                        instances.push(TestcaseInstance {
                            name,
                            param: Some(param),
                            testcase,
                        });
                    }
                }
                None => {
                    instances.push(TestcaseInstance {
                        name: factory.name().to_string(),
                        param: None,
                        testcase: factory.create(None),
                    });
                }
            }
        }

        instances
    }
}
